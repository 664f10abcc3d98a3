//! Dynamic SQL for movie listings.
//!
//! Pure builder: turns a [`MovieFilter`] into a page query and a matching
//! count query. Column names never come from user input; every value is a
//! bind parameter.

use rusqlite::types::Value;

use marquee_core::catalog::{MovieFilter, SortField, SortOrder};

use super::schema::MOVIE_COLUMNS;

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Maps a sort field onto its column.
pub fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Title => "m.title",
        SortField::ReleaseDate => "m.release_date",
        SortField::VoteAverage => "m.vote_average",
        SortField::Popularity => "m.popularity",
    }
}

pub fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

/// Escapes `LIKE` wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Builds the shared `WHERE` clause, or `None` when nothing is filtered.
fn build_where_clause(filter: &MovieFilter, params: &mut Vec<Value>) -> Option<String> {
    let mut conditions = Vec::new();

    if let Some(search) = &filter.search {
        let term = escape_like(&search.to_lowercase());
        params.push(Value::Text(format!("%{term}%")));
        conditions.push(format!("m.title_search LIKE ?{} ESCAPE '\\'", params.len()));
    }

    if !filter.genre_ids.is_empty() {
        let mut placeholders = Vec::with_capacity(filter.genre_ids.len());
        for id in &filter.genre_ids {
            params.push(Value::Integer(*id));
            placeholders.push(format!("?{}", params.len()));
        }
        // EXISTS keeps a movie with several matching genres to a single row.
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM movie_genres mg \
             WHERE mg.movie_id = m.id AND mg.genre_id IN ({}))",
            placeholders.join(", ")
        ));
    }

    if conditions.is_empty() {
        None
    } else {
        Some(conditions.join(" AND "))
    }
}

/// Builds the query for one page of movies.
pub fn build_page_query(filter: &MovieFilter) -> BuiltQuery {
    let mut params = Vec::new();
    let mut sql = format!("SELECT {MOVIE_COLUMNS} FROM movies m");

    if let Some(where_sql) = build_where_clause(filter, &mut params) {
        sql.push_str(" WHERE ");
        sql.push_str(&where_sql);
    }

    sql.push_str(&format!(
        " ORDER BY {} {}, m.id ASC",
        sort_column(filter.sort_by),
        sort_direction(filter.sort_order)
    ));

    params.push(Value::Integer(i64::from(filter.limit.max(1))));
    sql.push_str(&format!(" LIMIT ?{}", params.len()));
    params.push(Value::Integer(
        i64::try_from(filter.offset()).unwrap_or(i64::MAX),
    ));
    sql.push_str(&format!(" OFFSET ?{}", params.len()));

    BuiltQuery { sql, params }
}

/// Builds the query counting every movie the filter matches.
pub fn build_count_query(filter: &MovieFilter) -> BuiltQuery {
    let mut params = Vec::new();
    let mut sql = "SELECT COUNT(*) FROM movies m".to_string();

    if let Some(where_sql) = build_where_clause(filter, &mut params) {
        sql.push_str(" WHERE ");
        sql.push_str(&where_sql);
    }

    BuiltQuery { sql, params }
}
