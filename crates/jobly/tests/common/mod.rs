#![allow(dead_code)]

use tokio_postgres::{Client, NoTls, Transaction};

/// Connect to `DATABASE_URL`, or `None` when it isn't set (the test is skipped).
pub async fn try_connect() -> Option<Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

/// Temp tables shadow any real `companies`/`jobs` tables and vanish with the
/// transaction.
const SCHEMA: &str = "
CREATE TEMP TABLE companies (
  handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
  name TEXT UNIQUE NOT NULL,
  num_employees INTEGER CHECK (num_employees >= 0),
  description TEXT NOT NULL,
  logo_url TEXT
) ON COMMIT DROP;

CREATE TEMP TABLE jobs (
  id SERIAL PRIMARY KEY,
  title TEXT NOT NULL,
  salary INTEGER CHECK (salary >= 0),
  equity NUMERIC CHECK (equity <= 1.0),
  company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
) ON COMMIT DROP;

INSERT INTO companies (handle, name, num_employees, description, logo_url)
VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
       ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
       ('c3', 'C3', 3, 'Desc3', 'http://c3.img');
";

/// Ids of the seeded jobs j1, j2, j3.
pub struct Seeded {
    pub j1: i32,
    pub j2: i32,
    pub j3: i32,
}

/// Create the tables inside `tx` and seed three companies and three jobs:
///
/// | title | salary | equity | company |
/// |-------|--------|--------|---------|
/// | j1    | 10     | 0.1    | c1      |
/// | j2    | 20     | 0.2    | c2      |
/// | j3    | 30     | NULL   | c3      |
pub async fn seed(tx: &Transaction<'_>) -> Seeded {
    tx.batch_execute(SCHEMA).await.expect("create schema");

    let rows = tx
        .query(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ('j1', 10, 0.1, 'c1'),
                    ('j2', 20, 0.2, 'c2'),
                    ('j3', 30, NULL, 'c3')
             RETURNING id",
            &[],
        )
        .await
        .expect("seed jobs");
    let ids: Vec<i32> = rows.iter().map(|r| r.get(0)).collect();

    Seeded {
        j1: ids[0],
        j2: ids[1],
        j3: ids[2],
    }
}
