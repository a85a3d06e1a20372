//! Stock arithmetic on product rows.
//!
//! Every mutation is a single `UPDATE ... SET stock = stock +/- n` statement, so
//! concurrent callers never overwrite each other's changes.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::products::{Column as ProdCol, Entity as Products},
    error::{AppError, AppResult},
};

/// Removes `quantity` units only when at least that many are in stock.
///
/// Returns `false` when the product is missing or the stock is insufficient.
pub async fn deduct_stock<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<bool> {
    ensure_positive(quantity)?;

    let result = Products::update_many()
        .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
        .filter(ProdCol::Id.eq(product_id))
        .filter(ProdCol::Stock.gte(quantity))
        .exec(conn)
        .await?;

    let deducted = result.rows_affected == 1;
    if !deducted {
        tracing::debug!(%product_id, quantity, "stock deduction rejected");
    }
    Ok(deducted)
}

/// Removes `quantity` units without looking at the current stock, which may
/// therefore go negative. Checkout is the only caller.
///
/// Returns `false` when the product is missing. A result below `i32::MIN` is a
/// `BadRequest` and leaves the row untouched.
pub async fn deduct_stock_unchecked<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<bool> {
    ensure_positive(quantity)?;

    let result = Products::update_many()
        .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
        .filter(ProdCol::Id.eq(product_id))
        .filter(ProdCol::Stock.gte(i32::MIN + quantity))
        .exec(conn)
        .await?;

    if result.rows_affected == 1 {
        return Ok(true);
    }
    reject_out_of_range(conn, product_id).await
}

/// Puts `quantity` units back. Returns `false` when the product is missing; a
/// result above `i32::MAX` is a `BadRequest` and leaves the row untouched.
pub async fn restore_stock<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<bool> {
    ensure_positive(quantity)?;

    let result = Products::update_many()
        .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).add(quantity))
        .filter(ProdCol::Id.eq(product_id))
        .filter(ProdCol::Stock.lte(i32::MAX - quantity))
        .exec(conn)
        .await?;

    if result.rows_affected == 1 {
        return Ok(true);
    }
    reject_out_of_range(conn, product_id).await
}

/// Called after a range-guarded update matched no row: a missing product is
/// `false`, an existing one means the new stock would not fit.
async fn reject_out_of_range<C: ConnectionTrait>(conn: &C, product_id: Uuid) -> AppResult<bool> {
    let Some(product) = Products::find_by_id(product_id).one(conn).await? else {
        return Ok(false);
    };
    tracing::warn!(%product_id, stock = product.stock, "stock change out of range");
    Err(AppError::BadRequest("stock is out of range".to_string()))
}

fn ensure_positive(quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
