use anyhow::{bail, Result};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::{thread, time::Duration};

use crate::models::{GatewayProfile, Protocol};

/** \brief 数据库路径的环境变量覆盖。 */
pub const DB_PATH_ENV: &str = "ANTIGRAVITY_SNIPPETS_DB";

const DEFAULT_DB_PATH: &str = "antigravity-snippets.db";

/**
 * \brief 打开默认数据库文件，可通过环境变量覆盖路径。
 */
pub fn open_default_db() -> Result<Connection> {
    open_db(&default_db_path())
}

pub fn default_db_path() -> String {
    std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string())
}

/**
 * \brief 打开指定路径的数据库文件。
 */
pub fn open_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(conn)
}

/**
 * \brief 运行数据库迁移，创建必要表结构。
 */
pub fn migrate(conn: &Connection) -> Result<()> {
    retry_on_locked(|| {
        conn.execute_batch(
            r#"
        PRAGMA journal_mode=WAL;
        CREATE TABLE IF NOT EXISTS gateway_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL DEFAULT 'default',
            port INTEGER NOT NULL,
            api_key TEXT NOT NULL,
            model TEXT NOT NULL,
            protocol TEXT NOT NULL DEFAULT 'openai'
        );

        CREATE TABLE IF NOT EXISTS app_config (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
        )
    })?;
    Ok(())
}

fn set_config(conn: &Connection, key: &str, value: &str) -> Result<()> {
    retry_on_locked(|| {
        conn.execute(
            "INSERT INTO app_config (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )
    })?;
    Ok(())
}

fn get_config(conn: &Connection, key: &str) -> Result<Option<String>> {
    let val = conn
        .query_row(
            "SELECT value FROM app_config WHERE key=?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(val)
}

fn map_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<GatewayProfile> {
    Ok(GatewayProfile {
        id: row.get(0)?,
        name: row.get(1)?,
        port: row.get(2)?,
        api_key: row.get(3)?,
        model: row.get(4)?,
        protocol: Protocol::parse(&row.get::<_, String>(5)?),
    })
}

/**
 * \brief 新增网关档案。
 */
pub fn insert_profile(
    conn: &Connection,
    name: &str,
    port: i64,
    api_key: &str,
    model: &str,
    protocol: Protocol,
) -> Result<i64> {
    retry_on_locked(|| {
        conn.execute(
            "INSERT INTO gateway_profiles (name, port, api_key, model, protocol) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, port, api_key, model, protocol.as_str()],
        )
    })?;
    Ok(conn.last_insert_rowid())
}

/**
 * \brief 更新网关档案。
 */
pub fn update_profile(
    conn: &Connection,
    id: i64,
    name: &str,
    port: i64,
    api_key: &str,
    model: &str,
    protocol: Protocol,
) -> Result<()> {
    let rows = retry_on_locked(|| {
        conn.execute(
            "UPDATE gateway_profiles SET name=?1, port=?2, api_key=?3, model=?4, protocol=?5 WHERE id=?6",
            params![name, port, api_key, model, protocol.as_str(), id],
        )
    })?;
    if rows == 0 {
        bail!("profile id {} not found", id);
    }
    Ok(())
}

/**
 * \brief 删除网关档案；若为默认档案则同时清除默认标记。
 */
pub fn delete_profile(conn: &Connection, id: i64) -> Result<()> {
    if get_default_profile_id(conn)? == Some(id) {
        clear_default_profile(conn)?;
    }
    retry_on_locked(|| conn.execute("DELETE FROM gateway_profiles WHERE id=?1", params![id]))?;
    Ok(())
}

/**
 * \brief 列出所有网关档案。
 */
pub fn list_profiles(conn: &Connection) -> Result<Vec<GatewayProfile>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, port, api_key, model, protocol FROM gateway_profiles ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map([], map_profile)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_profile_by_id(conn: &Connection, id: i64) -> Result<Option<GatewayProfile>> {
    let profile = conn
        .query_row(
            "SELECT id, name, port, api_key, model, protocol FROM gateway_profiles WHERE id=?1",
            params![id],
            map_profile,
        )
        .optional()?;
    Ok(profile)
}

/**
 * \brief 设置默认网关档案。
 */
pub fn set_default_profile_id(conn: &Connection, id: i64) -> Result<()> {
    if get_profile_by_id(conn, id)?.is_none() {
        bail!("profile id {} not found", id);
    }
    set_config(conn, "default_profile_id", &id.to_string())
}

fn clear_default_profile(conn: &Connection) -> Result<()> {
    retry_on_locked(|| conn.execute("DELETE FROM app_config WHERE key='default_profile_id'", []))?;
    Ok(())
}

pub fn get_default_profile_id(conn: &Connection) -> Result<Option<i64>> {
    Ok(get_config(conn, "default_profile_id")?.and_then(|s| s.parse::<i64>().ok()))
}

/**
 * \brief 读取默认网关档案。
 */
pub fn get_default_profile(conn: &Connection) -> Result<Option<GatewayProfile>> {
    match get_default_profile_id(conn)? {
        Some(id) => get_profile_by_id(conn, id),
        None => Ok(None),
    }
}

/**
 * \brief 保存默认网关档案：存在则更新，否则新增并设为默认。
 */
pub fn upsert_default_profile(
    conn: &Connection,
    name: &str,
    port: i64,
    api_key: &str,
    model: &str,
    protocol: Protocol,
) -> Result<i64> {
    if let Some(existing) = get_default_profile(conn)? {
        update_profile(conn, existing.id, name, port, api_key, model, protocol)?;
        return Ok(existing.id);
    }
    let id = insert_profile(conn, name, port, api_key, model, protocol)?;
    set_default_profile_id(conn, id)?;
    Ok(id)
}

pub fn set_telemetry_enabled(conn: &Connection, enabled: bool) -> Result<()> {
    set_config(conn, "telemetry_enabled", if enabled { "1" } else { "0" })
}

pub fn get_telemetry_enabled(conn: &Connection) -> Result<bool> {
    Ok(get_config(conn, "telemetry_enabled")?
        .map(|s| s == "1")
        .unwrap_or(false))
}

/**
 * \brief 保存示例注释语言标签（如 "zh-CN"）。
 */
pub fn set_lang(conn: &Connection, lang: &str) -> Result<()> {
    set_config(conn, "lang", lang)
}

pub fn get_lang(conn: &Connection) -> Result<String> {
    Ok(get_config(conn, "lang")?.unwrap_or_else(|| "en".to_string()))
}

/**
 * \brief 针对 SQLite 锁冲突的重试助手。
 * \details 捕获 `database is locked`/`database table is locked` 等错误并进行线性退避，最大尝试 6 次。
 */
fn retry_on_locked<T, F>(mut action: F) -> Result<T>
where
    F: FnMut() -> rusqlite::Result<T>,
{
    const MAX_RETRIES: usize = 5;
    for attempt in 0..=MAX_RETRIES {
        match action() {
            Ok(value) => return Ok(value),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if matches!(
                    err.code,
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
                ) && attempt < MAX_RETRIES =>
            {
                let backoff = Duration::from_millis(200 * (attempt as u64 + 1));
                thread::sleep(backoff);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
    unreachable!("retry_on_locked should have returned within the loop");
}
