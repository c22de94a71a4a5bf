use anyhow::{Context, Result};
use sqlx::{PgPool, postgres::PgPoolOptions};

pub async fn connect_database(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .with_context(|| format!("failed to connect to {}", redact(database_url)))?;

    Ok(pool)
}

// 日志中隐藏连接串里的口令
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://***{}", &url[..scheme], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::redact;

    #[test]
    fn credentials_are_hidden() {
        assert_eq!(
            redact("postgres://cms:secret@db:5432/cms"),
            "postgres://***@db:5432/cms"
        );
        assert_eq!(redact("postgres://db/cms"), "postgres://db/cms");
    }
}
