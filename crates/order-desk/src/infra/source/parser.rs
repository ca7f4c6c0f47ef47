use std::str::FromStr;

use crate::domain::models::{Command, ParseError};

const CREATE_USAGE: &str = "create <customer> <product> <qty>";
const GET_USAGE: &str = "get <order-id>";
const LIST_USAGE: &str = "list";

/// Parses one input line. Returns `Ok(None)` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words = shlex::split(line).ok_or(ParseError::Unbalanced)?;
    let Some((verb, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (verb.to_ascii_lowercase().as_str(), args) {
        ("create", [customer, product, qty]) => Command::Create {
            customer: customer.clone(),
            product: product.clone(),
            qty: number("qty", qty)?,
        },
        ("create", _) => return Err(ParseError::Usage(CREATE_USAGE)),

        ("get", [id]) => Command::Get {
            order_id: number("order-id", id)?,
        },
        ("get", _) => return Err(ParseError::Usage(GET_USAGE)),

        ("list", []) => Command::List,
        ("list", _) => return Err(ParseError::Usage(LIST_USAGE)),

        (other, _) => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::NotANumber {
        field,
        value: value.to_string(),
    })
}
