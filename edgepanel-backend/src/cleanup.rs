use itertools::Itertools;

/// Trims leading and trailing whitespace from every line of the query
pub fn clean_query(query: &str) -> String {
    query.split('\n').map(str::trim).join("\n")
}
