use anyhow::{Context, Result};
use log::warn;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{format_datetime, now, parse_datetime},
    models::{Category, NewCategory},
};

/// Result of a write that can collide with the unique category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryWrite {
    Saved(i64),
    NameTaken,
    Missing,
}

fn row_to_category(row: &Row) -> Result<Category> {
    let created_at: String = row.get("created_at")?;

    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Insert a category unless another one already has its name.
    pub async fn insert_category(&self, category: NewCategory) -> Result<CategoryWrite> {
        self.execute(move |conn| {
            let rows_affected = conn
                .execute(
                    "INSERT INTO categories (name, color, created_at)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(name) DO NOTHING",
                    params![category.name, category.color, format_datetime(&now())],
                )
                .context("failed to insert category")?;

            if rows_affected == 0 {
                return Ok(CategoryWrite::NameTaken);
            }
            Ok(CategoryWrite::Saved(conn.last_insert_rowid()))
        })
        .await
    }

    /// Rename and/or recolor a category. `created_at` is never changed.
    pub async fn update_category(&self, category: &Category) -> Result<CategoryWrite> {
        let record = category.clone();
        self.execute(move |conn| {
            let clash: Option<i64> = conn
                .query_row(
                    "SELECT id FROM categories WHERE name = ?1 AND id != ?2",
                    params![record.name, record.id],
                    |row| row.get(0),
                )
                .optional()?;
            if clash.is_some() {
                return Ok(CategoryWrite::NameTaken);
            }

            let rows_affected = conn
                .execute(
                    "UPDATE categories SET name = ?1, color = ?2 WHERE id = ?3",
                    params![record.name, record.color, record.id],
                )
                .context("failed to update category")?;

            if rows_affected == 0 {
                return Ok(CategoryWrite::Missing);
            }
            Ok(CategoryWrite::Saved(record.id))
        })
        .await
    }

    /// Tasks that use the category name are left as they are.
    pub async fn delete_category(&self, category_id: i64) -> Result<bool> {
        self.execute(move |conn| {
            let rows_affected = conn
                .execute("DELETE FROM categories WHERE id = ?1", params![category_id])
                .context("failed to delete category")?;
            Ok(rows_affected > 0)
        })
        .await
    }

    pub async fn get_category(&self, category_id: i64) -> Result<Option<Category>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, color, created_at FROM categories WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![category_id])?;
            let category = match rows.next()? {
                Some(row) => Some(row_to_category(row)?),
                None => None,
            };
            Ok(category)
        })
        .await
    }

    /// All categories ordered by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, color, created_at
                 FROM categories
                 ORDER BY name ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut categories = Vec::new();
            while let Some(row) = rows.next()? {
                match row_to_category(row) {
                    Ok(category) => categories.push(category),
                    Err(err) => warn!("Skipping malformed category row: {err:#}"),
                }
            }

            Ok(categories)
        })
        .await
    }
}
