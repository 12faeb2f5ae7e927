//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `zerin_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use zerin_core::db::open_db_in_memory;
use zerin_core::{SqliteKvStore, UserDirectory};

fn main() {
    println!("zerin_core ping={}", zerin_core::ping());
    println!("zerin_core version={}", zerin_core::core_version());

    // Exercise the storage path end to end against a throwaway database.
    match open_db_in_memory() {
        Ok(conn) => match SqliteKvStore::try_new(&conn) {
            Ok(kv) => {
                let directory = UserDirectory::new(&kv);
                match directory.list_users() {
                    Ok(users) => println!("zerin_core directory_users={}", users.len()),
                    Err(err) => eprintln!("directory error: {err}"),
                }
            }
            Err(err) => eprintln!("store error: {err}"),
        },
        Err(err) => eprintln!("db error: {err}"),
    }
}
