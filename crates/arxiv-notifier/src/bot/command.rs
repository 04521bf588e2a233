//! Chat command parsing.

use crate::error::{CommandError, CommandResult};
use crate::models::Category;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a fetch cycle now and post the result.
    Fetch,
    /// Show the abstract of the N-th interesting paper (1-based).
    Abstract(usize),
    /// Show the interest list.
    Query,
    /// Add values to one category.
    AddQueries {
        /// Target category
        category: Category,
        /// Values to insert
        values: Vec<String>,
    },
    /// Remove values from every category.
    RemoveQueries(Vec<String>),
    /// Empty the interest list.
    ClearQuery,
    /// Change the search result cap.
    MaxResults(usize),
    /// List the commands.
    Help,
}

impl Command {
    /// Parse a chat line.
    ///
    /// Returns `None` when the line does not start with `prefix`, i.e. is
    /// ordinary chat and not addressed to the bot.
    #[must_use]
    pub fn parse(line: &str, prefix: &str) -> Option<CommandResult<Self>> {
        let rest = line.trim().strip_prefix(prefix)?;
        let mut tokens = tokenize(rest).into_iter();
        let name = tokens.next()?;
        let args: Vec<String> = tokens.collect();

        Some(Self::from_parts(&name, args))
    }

    fn from_parts(name: &str, args: Vec<String>) -> CommandResult<Self> {
        match name {
            "fetch" => Ok(Self::Fetch),
            "query" => Ok(Self::Query),
            "clear_query" => Ok(Self::ClearQuery),
            "help" => Ok(Self::Help),
            "abstract" => {
                let n = positive_number(args.first(), "paper number")?;
                Ok(Self::Abstract(n))
            }
            "max_results" => {
                let n = positive_number(args.first(), "max results")?;
                Ok(Self::MaxResults(n))
            }
            "add_queries" => {
                let mut args = args.into_iter();
                let category: Category =
                    args.next().ok_or(CommandError::MissingArgument("category"))?.parse()?;
                let values: Vec<String> = args.collect();
                if values.is_empty() {
                    return Err(CommandError::MissingArgument("queries"));
                }
                Ok(Self::AddQueries { category, values })
            }
            "remove_queries" => {
                if args.is_empty() {
                    return Err(CommandError::MissingArgument("queries"));
                }
                Ok(Self::RemoveQueries(args))
            }
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

fn positive_number(arg: Option<&String>, argument: &'static str) -> CommandResult<usize> {
    let raw = arg.ok_or(CommandError::MissingArgument(argument))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::invalid(argument, raw.as_str())),
    }
}

/// Split on whitespace, keeping double-quoted runs together.
///
/// An unterminated quote extends to the end of the input.
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    tokens.retain(|t| !t.trim().is_empty());
    tokens
}
