//! InfluxDB 1.x over its HTTP API.
//!
//! Batches are rendered to line protocol and posted to `/write` with
//! millisecond precision. Dataset existence is checked with `SHOW DATABASES`
//! and fixed with `CREATE DATABASE`.

use hyper::client::{Client, Response};
use metric::{FieldValue, Record, TagMap};
use serde_json::{self, Value};
use sink::{Batch, Storage, StorageError};
use std::io::Read;
use url::Url;

/// Configuration for the InfluxDB store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfluxDBConfig {
    /// The InfluxDB host. May be an IP address or DNS hostname.
    pub host: String,
    /// The InfluxDB HTTP port.
    pub port: u16,
    /// User to authenticate as, if the server requires it.
    pub user: Option<String>,
    /// Password of `user`.
    pub password: Option<String>,
}

impl Default for InfluxDBConfig {
    fn default() -> Self {
        InfluxDBConfig {
            host: "127.0.0.1".to_string(),
            port: 8086,
            user: None,
            password: None,
        }
    }
}

/// The InfluxDB store.
///
/// Refer to the documentation on `InfluxDBConfig` for more details.
pub struct InfluxDB {
    client: Client,
    base: Url,
    user: Option<String>,
    password: Option<String>,
}

/// Backslash `specials`. A backslash that would otherwise escape the next
/// separator, or that ends the string, is doubled.
#[inline]
fn escape(s: &str, specials: &[char], buf: &mut String) {
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if specials.contains(&c) {
            buf.push('\\');
        } else if c == '\\' && chars.peek().map_or(true, |n| specials.contains(n)) {
            buf.push('\\');
        }
        buf.push(c);
    }
}

/// Tags with an empty key or value are left out; the store refuses them.
#[inline]
fn fmt_tags(tags: &TagMap, s: &mut String) {
    for &(ref k, ref v) in tags.iter() {
        if k.is_empty() || v.is_empty() {
            continue;
        }
        s.push_str(",");
        escape(k, &[',', '=', ' '], s);
        s.push_str("=");
        escape(v, &[',', '=', ' '], s);
    }
}

#[inline]
fn fmt_fields(fields: &[(String, FieldValue)], s: &mut String) {
    let mut iter = fields.iter();
    if let Some(&(ref fk, ref fv)) = iter.next() {
        escape(fk, &[',', '=', ' '], s);
        s.push_str("=");
        s.push_str(&fv.to_string());
        for &(ref k, ref v) in iter {
            s.push_str(",");
            escape(k, &[',', '=', ' '], s);
            s.push_str("=");
            s.push_str(&v.to_string());
        }
    }
}

/// Render one record as a line protocol line, without the trailing newline.
pub fn fmt_line(record: &Record, s: &mut String) {
    escape(&record.measurement, &[',', ' '], s);
    fmt_tags(&record.tags, s);
    s.push_str(" ");
    fmt_fields(&record.fields, s);
    s.push_str(" ");
    s.push_str(&record.time.to_string());
}

/// Render a whole batch as line protocol, one record per line.
pub fn format_batch(batch: &Batch) -> String {
    let mut body = String::with_capacity(batch.len() * 256);
    for record in &batch.records {
        fmt_line(record, &mut body);
        body.push_str("\n");
    }
    body
}

/// Names listed in a `SHOW DATABASES` response.
fn database_names(body: &str) -> Result<Vec<String>, StorageError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| StorageError::Protocol(format!("unparseable query response: {}", e)))?;
    let results = match value.get("results").and_then(|r| r.as_array()) {
        Some(results) => results,
        None => {
            return Err(StorageError::Protocol(
                "query response without results".to_string(),
            ))
        }
    };
    let mut names = Vec::new();
    for result in results {
        if let Some(err) = result.get("error").and_then(|e| e.as_str()) {
            return Err(StorageError::Protocol(err.to_string()));
        }
        let series = result.get("series").and_then(|s| s.as_array());
        for serie in series.into_iter().flat_map(|s| s.iter()) {
            let rows = serie.get("values").and_then(|v| v.as_array());
            for row in rows.into_iter().flat_map(|r| r.iter()) {
                if let Some(name) = row.get(0).and_then(|n| n.as_str()) {
                    names.push(name.to_string());
                }
            }
        }
    }
    Ok(names)
}

fn quote_ident(name: &str) -> String {
    let mut s = String::with_capacity(name.len() + 2);
    s.push('"');
    escape(name, &['"', '\\'], &mut s);
    s.push('"');
    s
}

fn read_body(mut res: Response) -> Result<(u16, String), StorageError> {
    let status = res.status.to_u16();
    let mut body = String::new();
    res.read_to_string(&mut body)?;
    Ok((status, body))
}

fn check(status: u16, body: String) -> Result<String, StorageError> {
    if status >= 200 && status < 300 {
        Ok(body)
    } else {
        Err(StorageError::Rejected {
            status: status,
            body: body,
        })
    }
}

impl InfluxDB {
    /// Construct a new InfluxDB and check that the server answers its ping.
    ///
    /// An unreachable server is an error here rather than at first write.
    pub fn new(config: InfluxDBConfig) -> Result<InfluxDB, StorageError> {
        let db = InfluxDB::unchecked(config)?;
        db.ping()?;
        Ok(db)
    }

    fn unchecked(config: InfluxDBConfig) -> Result<InfluxDB, StorageError> {
        let base = Url::parse(&format!("http://{}:{}/", config.host, config.port))?;
        Ok(InfluxDB {
            client: Client::new(),
            base: base,
            user: config.user,
            password: config.password,
        })
    }

    /// Build the URL of `endpoint` with credentials and the given query pairs.
    fn url(&self, endpoint: &str, pairs: &[(&str, &str)]) -> Result<Url, StorageError> {
        let mut url = self.base.join(endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            for &(k, v) in pairs {
                query.append_pair(k, v);
            }
            if let Some(ref user) = self.user {
                query.append_pair("u", user);
            }
            if let Some(ref password) = self.password {
                query.append_pair("p", password);
            }
        }
        Ok(url)
    }

    /// Check the server is up.
    pub fn ping(&self) -> Result<(), StorageError> {
        let url = self.base.join("ping")?;
        trace!("GET {}", url);
        let (status, body) = read_body(self.client.get(url.as_str()).send()?)?;
        check(status, body).map(|_| ())
    }

    fn query(&self, q: &str, post: bool) -> Result<String, StorageError> {
        let url = self.url("query", &[("q", q)])?;
        trace!("{} query {:?}", if post { "POST" } else { "GET" }, q);
        let res = if post {
            self.client.post(url.as_str()).send()?
        } else {
            self.client.get(url.as_str()).send()?
        };
        let (status, body) = read_body(res)?;
        check(status, body)
    }

    /// Names of every database on the server.
    pub fn databases(&self) -> Result<Vec<String>, StorageError> {
        let body = self.query("SHOW DATABASES", false)?;
        database_names(&body)
    }
}

impl Storage for InfluxDB {
    fn ensure_database_exists(&mut self, name: &str) -> Result<(), StorageError> {
        let dbs = self.databases()?;
        if dbs.iter().any(|db| db == name) {
            debug!("database {} exists", name);
            return Ok(());
        }
        info!("creating database {}", name);
        let body = self.query(&format!("CREATE DATABASE {}", quote_ident(name)), true)?;
        // the query endpoint reports statement errors with a 200
        database_names(&body).map(|_| ())
    }

    fn write_batch(&mut self, batch: &Batch) -> Result<(), StorageError> {
        if batch.is_empty() {
            debug!("nothing to write to {}", batch.database);
            return Ok(());
        }
        let body = format_batch(batch);
        let url = self.url(
            "write",
            &[
                ("db", batch.database.as_str()),
                ("consistency", batch.consistency.as_str()),
                ("precision", "ms"),
            ],
        )?;
        trace!(
            "POST write of {} records to {} with consistency {}",
            batch.len(),
            batch.database,
            batch.consistency.as_str()
        );
        let (status, resp) = read_body(self.client.post(url.as_str()).body(body.as_str()).send()?)?;
        check(status, resp).map(|_| ())
    }
}
