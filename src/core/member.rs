use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::member::{Member, MemberFilter, MemberInput};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Member directory operations.
pub struct MemberLogic;

/// Trimmed name (required) and community label (blank becomes `None`).
fn normalize(input: &MemberInput) -> AppResult<(String, Option<String>)> {
    let name = input.full_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("fullName is required".into()));
    }

    let community = input
        .community_number
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok((name.to_string(), community))
}

impl MemberLogic {
    /// Register a member with a fresh random scan token.
    pub fn add(pool: &mut DbPool, input: &MemberInput, now: DateTime<Utc>) -> AppResult<Member> {
        let (name, community) = normalize(input)?;
        let qr_code = Uuid::new_v4().to_string();

        let tx = pool.conn.transaction()?;
        let member = queries::insert_member(&tx, &name, community.as_deref(), &qr_code, now)?;
        ttlog(
            &tx,
            "member_add",
            &member.id.to_string(),
            &format!("Registered '{}'", member.full_name),
        )?;
        tx.commit()?;

        Ok(member)
    }

    /// Members ordered by display name, optionally filtered.
    pub fn list(pool: &mut DbPool, filter: &MemberFilter) -> AppResult<Vec<Member>> {
        let members = queries::load_members(&pool.conn)?;
        Ok(members.into_iter().filter(|m| filter.matches(m)).collect())
    }

    pub fn get(pool: &mut DbPool, id: i64) -> AppResult<Member> {
        queries::find_member_by_id(&pool.conn, id)?
            .ok_or_else(|| AppError::MemberNotFound(format!("id {id}")))
    }

    /// Edit name and community label. The scan token never changes.
    pub fn update(pool: &mut DbPool, id: i64, input: &MemberInput) -> AppResult<Member> {
        let (name, community) = normalize(input)?;

        let tx = pool.conn.transaction()?;
        if queries::update_member(&tx, id, &name, community.as_deref())? == 0 {
            return Err(AppError::MemberNotFound(format!("id {id}")));
        }
        ttlog(&tx, "member_edit", &id.to_string(), &format!("Renamed to '{name}'"))?;
        let member = queries::find_member_by_id(&tx, id)?
            .ok_or_else(|| AppError::MemberNotFound(format!("id {id}")))?;
        tx.commit()?;

        Ok(member)
    }

    /// Delete a member together with all of their attendance events.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<Member> {
        let tx = pool.conn.transaction()?;
        let member = queries::find_member_by_id(&tx, id)?
            .ok_or_else(|| AppError::MemberNotFound(format!("id {id}")))?;

        queries::delete_member(&tx, id)?;
        ttlog(
            &tx,
            "member_del",
            &id.to_string(),
            &format!("Deleted '{}' and their attendance history", member.full_name),
        )?;
        tx.commit()?;

        Ok(member)
    }
}
