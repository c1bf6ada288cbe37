//! A1 notation helpers

/// Quote a tab title for use in a range: `It's` becomes `'It''s'`
pub fn quote_tab(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Range covering the whole tab
pub fn whole_tab(title: &str) -> String {
    quote_tab(title)
}

/// Range anchored at the tab's first cell
pub fn first_cell(title: &str) -> String {
    format!("{}!A1", quote_tab(title))
}
