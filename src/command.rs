//! Interactive shell commands.
//!
//! ```text
//! search [term]                     set the search term (empty clears it)
//! add title="Dune" author=Herbert   add a book (keys: title author year isbn price)
//! delete <id>                       delete a book by id
//! press <row> [column]              trigger a row action, default column "actions"
//! sort [field [asc|desc]]           sort the grid; no field restores view order
//! where [field=text]                add a column filter; no argument clears them
//! reload | show | help | quit
//! ```

use std::fmt;

use crate::book::NewBook;
use crate::grid::{ColumnFilter, SortDirection, SortSpec, ACTIONS_COLUMN};
use crate::session::Command;
use crate::store::check_key;

pub const HELP: &str = "\
commands:
  search [term]                     filter by title or author (empty clears)
  add title=\"...\" author=\"...\" [year=...] [isbn=...] [price=...]
  delete <id>                       delete a book by id
  press <row> [column]              trigger the row action (default column: actions)
  sort [field [asc|desc]]           sort the grid (no field: view order)
  where [field=text]                column filter (no argument: clear filters)
  reload                            re-fetch the collection
  show                              print the grid
  help                              this text
  quit                              leave the shell";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Catalog(Command),
    Press { row: usize, column: String },
    Sort(Option<SortSpec>),
    Where(Option<ColumnFilter>),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Split on whitespace, keeping double-quoted runs together and dropping
/// the quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(ParseError("unterminated quote".into()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse one shell line. Blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (verb, raw_rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest),
        None => (line, ""),
    };
    let rest = raw_rest.trim();

    let command = match verb.to_ascii_lowercase().as_str() {
        // The search term is everything after the separating space, untrimmed.
        "search" | "s" => ShellCommand::Catalog(Command::Search(raw_rest.to_string())),
        "add" => ShellCommand::Catalog(Command::Add(parse_book(&tokenize(rest)?)?)),
        "delete" | "rm" => {
            let id = single_arg(&tokenize(rest)?, "delete <id>")?;
            check_key(&id).map_err(|e| ParseError(e.to_string()))?;
            ShellCommand::Catalog(Command::Delete(id))
        }
        "reload" => ShellCommand::Catalog(Command::Reload),
        "press" => {
            let args = tokenize(rest)?;
            let row = args
                .first()
                .and_then(|raw| raw.parse::<usize>().ok())
                .ok_or_else(|| ParseError("usage: press <row> [column]".into()))?;
            let column = args
                .get(1)
                .cloned()
                .unwrap_or_else(|| ACTIONS_COLUMN.to_string());
            ShellCommand::Press { row, column }
        }
        "sort" => {
            let args = tokenize(rest)?;
            match args.as_slice() {
                [] => ShellCommand::Sort(None),
                [field] => ShellCommand::Sort(Some(SortSpec {
                    field: field.clone(),
                    direction: SortDirection::Ascending,
                })),
                [field, direction] => ShellCommand::Sort(Some(SortSpec {
                    field: field.clone(),
                    direction: direction
                        .parse()
                        .map_err(|e: crate::grid::GridError| ParseError(e.to_string()))?,
                })),
                _ => return Err(ParseError("usage: sort [field [asc|desc]]".into())),
            }
        }
        "where" => {
            if rest.is_empty() {
                ShellCommand::Where(None)
            } else {
                let filter = rest
                    .parse::<ColumnFilter>()
                    .map_err(|e| ParseError(e.to_string()))?;
                ShellCommand::Where(Some(filter))
            }
        }
        "show" | "ls" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(ParseError(format!("unknown command: {} (try help)", other))),
    };
    Ok(Some(command))
}

fn single_arg(args: &[String], usage: &str) -> Result<String, ParseError> {
    match args {
        [arg] => Ok(arg.clone()),
        _ => Err(ParseError(format!("usage: {}", usage))),
    }
}

/// Build a book from `key=value` tokens.
fn parse_book(args: &[String]) -> Result<NewBook, ParseError> {
    if args.is_empty() {
        return Err(ParseError(
            "usage: add title=\"...\" author=\"...\" [year=...] [isbn=...] [price=...]".into(),
        ));
    }

    let mut book = NewBook::default();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| ParseError(format!("expected key=value, got {:?}", arg)))?;
        match key {
            "title" => book.title = value.to_string(),
            "author" => book.author = value.to_string(),
            "year" => book.year = value.into(),
            "isbn" => book.isbn = value.into(),
            "price" => book.price = value.into(),
            other => return Err(ParseError(format!("unknown field: {}", other))),
        }
    }
    Ok(book)
}
