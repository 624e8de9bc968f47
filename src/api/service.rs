use super::ApiResponse;
use super::request::{ApiRequest, required_id};
use crate::core::attendance::AttendanceLogic;
use crate::core::business_day::{BusinessClock, format_dmy, parse_dmy};
use crate::core::calendar::MeetingCalendar;
use crate::core::checkin::CheckInLogic;
use crate::core::member::MemberLogic;
use crate::core::report::ReportLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::member::{MemberFilter, MemberInput};
use crate::notify::{CheckInNotice, Outbox};
use crate::ui::messages::error;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

/// Handles API requests against one store.
pub struct Service<'a> {
    pool: &'a mut DbPool,
    clock: BusinessClock,
    calendar: &'a dyn MeetingCalendar,
    outbox: &'a Outbox,
}

impl<'a> Service<'a> {
    pub fn new(
        pool: &'a mut DbPool,
        clock: BusinessClock,
        calendar: &'a dyn MeetingCalendar,
        outbox: &'a Outbox,
    ) -> Self {
        Self {
            pool,
            clock,
            calendar,
            outbox,
        }
    }

    /// Parse and handle a raw JSON request.
    pub fn handle_json(&mut self, raw: &str, now: DateTime<Utc>) -> ApiResponse {
        match ApiRequest::from_json(raw) {
            Ok(request) => self.handle(request, now),
            Err(e) => ApiResponse::error(400, format!("Malformed request: {e}")),
        }
    }

    pub fn handle(&mut self, request: ApiRequest, now: DateTime<Utc>) -> ApiResponse {
        let failure = request.failure_message();

        match self.dispatch(request, now) {
            Ok(body) => ApiResponse::ok(body),
            Err(e) if e.is_client_error() => ApiResponse::error(e.status(), public_message(&e)),
            Err(e) => {
                error(format!("{failure}: {e}"));
                ApiResponse::error(e.status(), failure)
            }
        }
    }

    fn dispatch(&mut self, request: ApiRequest, now: DateTime<Utc>) -> AppResult<Value> {
        match request {
            ApiRequest::CheckIn { qr_code, date } => self.check_in(qr_code, date, now),

            ApiRequest::ListMembers { community, search } => {
                let filter = MemberFilter { community, search };
                let members = MemberLogic::list(self.pool, &filter)?;
                Ok(serde_json::to_value(members)?)
            }

            ApiRequest::CreateMember {
                full_name,
                community_number,
            } => {
                let input = MemberInput::new(full_name.unwrap_or_default(), community_number);
                let member = MemberLogic::add(self.pool, &input, now)?;
                Ok(serde_json::to_value(member)?)
            }

            ApiRequest::UpdateMember {
                id,
                full_name,
                community_number,
            } => {
                let id = required_id(&id, "id")?;
                let input = MemberInput::new(full_name.unwrap_or_default(), community_number);
                let member = MemberLogic::update(self.pool, id, &input)?;
                Ok(serde_json::to_value(member)?)
            }

            ApiRequest::DeleteMember { id } => {
                let id = required_id(&id, "id")?;
                MemberLogic::delete(self.pool, id)?;
                Ok(json!({ "success": true }))
            }

            ApiRequest::DeleteAttendance { user_id, date } => {
                let member_id = required_id(&user_id, "userId")?;
                let date = date.ok_or_else(|| AppError::Validation("date is required".into()))?;
                let date = parse_dmy(&date)?;
                let count = AttendanceLogic::delete_for_day(self.pool, &self.clock, member_id, date)?;
                Ok(json!({ "success": true, "count": count }))
            }

            ApiRequest::AttendanceReport => {
                let rows = ReportLogic::rows(self.pool, &self.clock)?;
                Ok(serde_json::to_value(rows)?)
            }

            ApiRequest::AttendanceMatrix { year, month, today } => {
                let today = match today {
                    Some(s) => parse_dmy(&s)?,
                    None => self.clock.today(now),
                };
                let matrix =
                    ReportLogic::matrix(self.pool, &self.clock, self.calendar, year, month, today)?;

                let rows: Vec<Value> = matrix
                    .rows
                    .iter()
                    .map(|r| {
                        json!({
                            "id": r.member.id,
                            "fullName": r.member.full_name,
                            "communityNumber": r.member.community_number,
                            "cells": r.cells.iter().map(|c| c.symbol()).collect::<Vec<_>>(),
                        })
                    })
                    .collect();

                Ok(json!({
                    "year": matrix.year,
                    "month": matrix.month,
                    "today": format_dmy(matrix.today),
                    "dates": matrix.date_labels(),
                    "rows": rows,
                }))
            }
        }
    }

    fn check_in(
        &mut self,
        qr_code: Option<String>,
        date: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<Value> {
        let token = qr_code.unwrap_or_default();
        let explicit = match date.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Some(parse_dmy(d)?),
            _ => None,
        };

        let outcome = CheckInLogic::apply(self.pool, &self.clock, &token, explicit, now)?;

        // Committed: the notice can no longer affect the outcome.
        self.outbox
            .publish(CheckInNotice::from_outcome(&outcome, &self.clock));

        Ok(json!({
            "success": true,
            "updated": outcome.updated,
            "user": outcome.member.full_name,
            "time": outcome.recorded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }))
    }
}

/// Caller-facing text for 4xx errors.
fn public_message(e: &AppError) -> String {
    match e {
        AppError::MemberNotFound(_) => "Usuario no encontrado".to_string(),
        AppError::Validation(msg) => msg.clone(),
        AppError::InvalidDate(msg) => format!("Invalid date: {msg}"),
        AppError::Json(_) => "Malformed request".to_string(),
        _ => "Request failed".to_string(),
    }
}
