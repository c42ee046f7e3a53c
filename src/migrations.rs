//! Schema migrations for the exchange tables.
//!
//! Idempotent: every statement is `CREATE TABLE IF NOT EXISTS`.

use sqlx::MySqlPool;

const STATEMENTS: [(&str, &str); 3] = [
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            username VARCHAR(191) NOT NULL UNIQUE,
            password VARCHAR(255) NOT NULL,
            created_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
            updated_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3)
        )
        "#,
    ),
    (
        "articles",
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            content TEXT NOT NULL,
            author VARCHAR(191) NOT NULL,
            created_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
            updated_at DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3)
        )
        "#,
    ),
    (
        "exchange_rates",
        r#"
        CREATE TABLE IF NOT EXISTS exchange_rates (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            base_currency CHAR(3) NOT NULL,
            target_currency CHAR(3) NOT NULL,
            rate DOUBLE NOT NULL,
            date DATETIME(3) NOT NULL,
            INDEX idx_exchange_rates_pair (base_currency, target_currency)
        )
        "#,
    ),
];

/// Names of the tables this module manages, in creation order.
pub fn tables() -> impl Iterator<Item = &'static str> {
    STATEMENTS.iter().map(|(table, _)| *table)
}

/// Run all migrations.
pub async fn run(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema migrations...");

    for (table, statement) in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
        tracing::debug!(table, "Table ensured");
    }

    tracing::info!("Schema migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_tables() {
        assert_eq!(
            tables().collect::<Vec<_>>(),
            ["users", "articles", "exchange_rates"]
        );
    }

    #[test]
    fn test_statements_are_idempotent() {
        for (table, statement) in STATEMENTS {
            assert!(
                statement.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
                "{table} must be created idempotently"
            );
        }
    }
}
