use catalog_core::{Msg, SortField, ROWS_PER_PAGE_OPTIONS};

#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    /// Messages produced by one line of input, applied before rendering.
    Dispatch(Vec<Msg>),
    Help,
    ListCategories,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> UiCommand {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => UiCommand::Dispatch(Vec::new()),
        "search" | "s" | "/" => UiCommand::Dispatch(vec![Msg::SearchChanged(rest.to_string())]),
        "type" => {
            let mut typed = String::new();
            let msgs = rest
                .chars()
                .map(|ch| {
                    typed.push(ch);
                    Msg::SearchChanged(typed.clone())
                })
                .collect();
            UiCommand::Dispatch(msgs)
        }
        "clear" => UiCommand::Dispatch(vec![Msg::SearchCleared]),
        "category" | "c" => {
            let slug = (!rest.is_empty()).then(|| rest.to_string());
            UiCommand::Dispatch(vec![Msg::CategorySelected(slug)])
        }
        "categories" => UiCommand::ListCategories,
        "sort" | "o" => match rest.parse::<SortField>() {
            Ok(field) => UiCommand::Dispatch(vec![Msg::SortClicked(field)]),
            Err(err) => UiCommand::Invalid(err),
        },
        "page" => match rest.parse::<usize>() {
            Ok(page) if page >= 1 => UiCommand::Dispatch(vec![Msg::PageChanged(page - 1)]),
            _ => UiCommand::Invalid(format!("page expects a number from 1, got {rest:?}")),
        },
        "next" | "n" => UiCommand::Dispatch(vec![Msg::NextPage]),
        "prev" | "p" => UiCommand::Dispatch(vec![Msg::PreviousPage]),
        "rows" => match rest.parse::<usize>() {
            Ok(rows) if ROWS_PER_PAGE_OPTIONS.contains(&rows) => {
                UiCommand::Dispatch(vec![Msg::RowsPerPageChanged(rows)])
            }
            _ => UiCommand::Invalid(format!(
                "rows expects one of {ROWS_PER_PAGE_OPTIONS:?}, got {rest:?}"
            )),
        },
        "help" | "?" | "h" => UiCommand::Help,
        "quit" | "exit" | "q" => UiCommand::Quit,
        other => UiCommand::Invalid(format!("unknown command {other:?}; type help")),
    }
}
