use axum::extract::Query;
use serde::Deserialize;

pub async fn index() -> &'static str {
    "Hello World"
}

#[derive(Debug, Default, Deserialize)]
pub struct BarQuery {
    pub name: Option<String>,
}

/// Greets `?name=`; absent or empty falls back to "Bar".
pub async fn bar(Query(q): Query<BarQuery>) -> String {
    let name = q.name.filter(|n| !n.is_empty());
    format!("Hello {}!", name.as_deref().unwrap_or("Bar"))
}
