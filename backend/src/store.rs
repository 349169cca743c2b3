//! # Redis
//!
//! Persistent voter store on top of Redis with the RedisJSON module.
//!
//! ## Layout
//!
//! - One key per voter: `voter:<id>`
//! - The value is the whole voter document, history included, written with
//!   `JSON.SET` and read back with `JSON.GET`
//! - Updates replace the full document; there are no field-level patches
//! - Listing and bulk delete enumerate `KEYS voter:*`
//!
//! Calls block on the connection. Nothing here retries or times out, and
//! there is no locking across processes: two writers to the same voter race
//! and the last `JSON.SET` wins.
use redis::{Client, Connection};
use shared::{Error, ErrorCode, Result, Voter, VoterStore};
use tracing::{debug, info, warn};

pub const REDIS_KEY_PREFIX: &str = "voter:";
pub const DEFAULT_REDIS_ADDRESS: &str = "0.0.0.0:6379";

pub struct RedisStore {
    connection: Connection,
}

impl RedisStore {
    /// Opens a connection to `address` and pings it. A bare `host:port` is
    /// treated as `redis://host:port`.
    pub fn connect(address: &str) -> Result<Self> {
        let url = redis_url(address);
        let client = Client::open(url.as_str()).map_err(|e| Error::backend("invalid redis address", e))?;
        let mut connection = client
            .get_connection()
            .map_err(|e| Error::backend(format!("failed to connect to redis at {url}"), e))?;

        redis::cmd("PING")
            .query::<String>(&mut connection)
            .map_err(|e| Error::backend("redis did not answer ping", e))?;

        info!("Connected to redis at {}", url);
        Ok(Self { connection })
    }

    fn voter_keys(&mut self) -> Result<Vec<String>> {
        redis::cmd("KEYS")
            .arg(format!("{REDIS_KEY_PREFIX}*"))
            .query(&mut self.connection)
            .map_err(|e| Error::backend("failed to list voter keys", e))
    }

    fn load_key(&mut self, key: &str) -> Result<Option<Voter>> {
        let document: Option<String> = redis::cmd("JSON.GET")
            .arg(key)
            .arg(".")
            .query(&mut self.connection)
            .map_err(|e| Error::backend(format!("failed to read {key}"), e))?;

        document
            .map(|doc| serde_json::from_str(&doc).map_err(Error::from))
            .transpose()
    }
}

impl VoterStore for RedisStore {
    fn exists(&mut self, voter_id: u64) -> Result<bool> {
        let found: u64 = redis::cmd("EXISTS")
            .arg(voter_key(voter_id))
            .query(&mut self.connection)
            .map_err(|e| Error::backend("failed to check voter", e))?;
        Ok(found > 0)
    }

    fn load(&mut self, voter_id: u64) -> Result<Voter> {
        self.load_key(&voter_key(voter_id))?
            .ok_or_else(|| Error::voter_not_found(voter_id))
    }

    fn store(&mut self, voter_id: u64, voter: &Voter) -> Result<()> {
        let key = voter_key(voter_id);
        let document = serde_json::to_string(voter)?;
        redis::cmd("JSON.SET")
            .arg(&key)
            .arg(".")
            .arg(document)
            .query::<()>(&mut self.connection)
            .map_err(|e| Error::backend(format!("failed to write {key}"), e))?;
        debug!(key = %key, "Stored voter document");
        Ok(())
    }

    fn delete(&mut self, voter_id: u64) -> Result<()> {
        let removed: u64 = redis::cmd("DEL")
            .arg(voter_key(voter_id))
            .query(&mut self.connection)
            .map_err(|e| Error::backend("failed to delete voter", e))?;

        if removed == 0 {
            return Err(Error::voter_not_found(voter_id));
        }
        Ok(())
    }

    fn delete_all(&mut self) -> Result<usize> {
        let keys = self.voter_keys()?;
        if keys.is_empty() {
            return Ok(0);
        }

        let removed: usize = redis::cmd("DEL")
            .arg(&keys)
            .query(&mut self.connection)
            .map_err(|e| Error::backend("failed to delete voters", e))?;

        check_deleted(keys.len(), removed)
    }

    fn list_all(&mut self) -> Result<Vec<Voter>> {
        let keys = self.voter_keys()?;
        let mut voters = Vec::with_capacity(keys.len());
        for key in keys {
            let voter = self.load_key(&key)?.ok_or_else(|| {
                Error::with_details(ErrorCode::Backend, "voter disappeared while listing", key.clone())
            })?;
            voters.push(voter);
        }
        Ok(voters)
    }
}

/// A bulk delete only succeeds if `DEL` removed every key `KEYS` listed.
/// A mismatch means someone else touched the namespace in between.
fn check_deleted(listed: usize, removed: usize) -> Result<usize> {
    if removed != listed {
        warn!(listed, removed, "Voter count changed during delete");
        return Err(Error::with_details(
            ErrorCode::Backend,
            "failed to delete all voters",
            format!("listed {listed} keys but removed {removed}"),
        ));
    }
    Ok(removed)
}

pub fn voter_key(voter_id: u64) -> String {
    format!("{REDIS_KEY_PREFIX}{voter_id}")
}

pub fn redis_url(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("redis://{address}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(voter_key(0), "voter:0");
        assert_eq!(voter_key(42), "voter:42");
    }

    #[test]
    fn bare_addresses_get_a_scheme() {
        assert_eq!(redis_url(DEFAULT_REDIS_ADDRESS), "redis://0.0.0.0:6379");
        assert_eq!(redis_url("redis://cache:6380/1"), "redis://cache:6380/1");
    }

    #[test]
    fn delete_count_must_match_listing() {
        assert_eq!(check_deleted(3, 3).unwrap(), 3);

        let err = check_deleted(3, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::Backend);
        assert_eq!(err.details.as_deref(), Some("listed 3 keys but removed 2"));
    }

    fn live_store() -> RedisStore {
        let address = std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_ADDRESS.into());
        RedisStore::connect(&address).expect("redis with RedisJSON must be running")
    }

    #[test]
    #[ignore = "needs a redis-stack server"]
    fn stores_and_loads_documents() {
        let mut store = live_store();
        let voter_id = 987_654_321;
        let _ = store.delete(voter_id);

        assert!(!store.exists(voter_id).unwrap());
        assert!(store.load(voter_id).unwrap_err().is_not_found());

        let voter = Voter::new(voter_id, "A", "a@x.com");
        store.store(voter_id, &voter).unwrap();
        assert!(store.exists(voter_id).unwrap());
        assert_eq!(store.load(voter_id).unwrap(), voter);

        store.delete(voter_id).unwrap();
        assert!(store.delete(voter_id).unwrap_err().is_not_found());
    }

    #[test]
    #[ignore = "needs a redis-stack server"]
    fn lists_and_deletes_every_voter() {
        let mut store = live_store();
        store.delete_all().unwrap();
        assert_eq!(store.delete_all().unwrap(), 0);

        let first = Voter::new(1, "A", "a@x.com");
        let second = Voter::new(2, "B", "b@x.com");
        store.store(1, &first).unwrap();
        store.store(2, &second).unwrap();

        let mut voters = store.list_all().unwrap();
        voters.sort_by_key(|v| v.voter_id);
        assert_eq!(voters, vec![first, second]);

        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.delete_all().unwrap(), 0);
    }
}
