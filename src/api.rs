// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the finance tracking API.

use crate::models::{Category, Expense, Income, NewExpense, NewIncome, Snapshot, User, lenient};
use crate::month::YearMonth;
use crate::review::{CategoryMarks, MonthlyReview};
use crate::session::Session;
use crate::utils::http_client;
use anyhow::Result;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

/// Paths that never carry the bearer token.
const UNAUTHENTICATED_PATHS: [&str; 4] = ["/signup", "/login", "/forgot_password", "/reset_password"];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} returned {status}: {message}")]
    Status {
        path: String,
        status: StatusCode,
        message: String,
    },
    #[error("unexpected response body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} did not return a token")]
    MissingToken(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    #[serde(default, deserialize_with = "lenient")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    token: Option<String>,
}

/// Result of a password reset. Some servers log the user straight in and
/// return a fresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    pub message: String,
    pub token: Option<String>,
}

/// Human readable message for an error response: the `errors` list joined
/// with commas, else `error` or `message`, else the HTTP reason phrase.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        if let Some(errs) = v.get("errors").and_then(Value::as_array) {
            let parts: Vec<String> = errs
                .iter()
                .map(|e| match e {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            if !parts.is_empty() {
                return parts.join(", ");
            }
        }
        for key in ["error", "message"] {
            if let Some(s) = v.get(key).and_then(Value::as_str) {
                return s.to_string();
            }
        }
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: &Session) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: session.token().map(str::to_string),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(method = method.as_str(), path, "api request");
        let rb = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(t) if !UNAUTHENTICATED_PATHS.contains(&path) => rb.bearer_auth(t),
            _ => rb,
        }
    }

    fn send_raw(&self, path: &str, rb: RequestBuilder) -> Result<String, ApiError> {
        let resp = rb.send().map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        let status = resp.status();
        let body = resp.text().map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(path, status = status.as_u16(), message = message.as_str(), "api error");
            return Err(ApiError::Status {
                path: path.to_string(),
                status,
                message,
            });
        }
        Ok(body)
    }

    fn send<T: DeserializeOwned>(&self, path: &str, rb: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(path, rb)?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(path, self.request(Method::GET, path))
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_raw(path, self.request(Method::DELETE, path))
            .map(|_| ())
    }

    fn patch<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ApiError> {
        self.send(path, self.request(Method::PATCH, path).json(body))
    }

    /// Send `body` and read an optional `{message, token}` reply; a body
    /// that is not that shape is treated as empty.
    fn message(&self, method: Method, path: &str, body: &Value) -> Result<MessageResponse, ApiError> {
        let text = self.send_raw(path, self.request(method, path).json(body))?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    fn token_from(&self, path: &str, body: Value) -> Result<String, ApiError> {
        let resp: TokenResponse = self.send(path, self.request(Method::POST, path).json(&body))?;
        resp.token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::MissingToken(path.to_string()))
    }

    pub fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.token_from("/login", json!({ "email": email, "password": password }))
    }

    pub fn signup(
        &self,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<String, ApiError> {
        self.token_from(
            "/signup",
            json!({ "user": {
                "email": email,
                "password": password,
                "password_confirmation": password_confirmation,
            }}),
        )
    }

    pub fn user(&self, id: i64) -> Result<User, ApiError> {
        self.get(&format!("/users/{}", id))
    }

    pub fn update_hourly_wage(&self, id: i64, hourly_wage: &str) -> Result<User, ApiError> {
        self.patch(&format!("/users/{}", id), &json!({ "hourly_wage": hourly_wage }))
    }

    /// Change the logged in user's password; returns the server's message.
    pub fn change_password(
        &self,
        current: &str,
        new: &str,
        confirmation: &str,
    ) -> Result<String, ApiError> {
        let resp = self.message(
            Method::PATCH,
            "/change_password",
            &json!({
                "current_password": current,
                "new_password": new,
                "password_confirmation": confirmation,
            }),
        )?;
        Ok(resp
            .message
            .unwrap_or_else(|| "Password changed successfully!".into()))
    }

    pub fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        let resp = self.message(Method::POST, "/forgot_password", &json!({ "email": email }))?;
        Ok(resp
            .message
            .unwrap_or_else(|| "Password reset instructions sent to your email!".into()))
    }

    pub fn reset_password(
        &self,
        token: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<PasswordReset, ApiError> {
        let resp = self.message(
            Method::POST,
            "/reset_password",
            &json!({
                "token": token,
                "password": password,
                "password_confirmation": confirmation,
            }),
        )?;
        Ok(PasswordReset {
            message: resp
                .message
                .unwrap_or_else(|| "Password reset successfully!".into()),
            token: resp.token.filter(|t| !t.is_empty()),
        })
    }

    pub fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/categories")
    }

    pub fn create_category(&self, name: &str, is_default: bool) -> Result<Category, ApiError> {
        let path = "/categories";
        self.send(
            path,
            self.request(Method::POST, path)
                .json(&json!({ "name": name, "is_default": is_default })),
        )
    }

    pub fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/categories/{}", id))
    }

    /// Expenses, optionally narrowed server side to one month.
    pub fn expenses(&self, month: Option<YearMonth>) -> Result<Vec<Expense>, ApiError> {
        let path = "/expenses";
        let mut rb = self.request(Method::GET, path);
        if let Some(m) = month {
            rb = rb.query(&[("month", m.month.to_string()), ("year", m.year.to_string())]);
        }
        self.send(path, rb)
    }

    pub fn create_expense(&self, expense: &NewExpense) -> Result<Expense, ApiError> {
        let path = "/expenses";
        self.send(
            path,
            self.request(Method::POST, path)
                .json(&json!({ "expense": expense })),
        )
    }

    pub fn expense(&self, id: i64) -> Result<Expense, ApiError> {
        self.get(&format!("/expenses/{}", id))
    }

    pub fn update_expense(&self, id: i64, expense: &NewExpense) -> Result<Expense, ApiError> {
        self.patch(&format!("/expenses/{}", id), &json!({ "expense": expense }))
    }

    pub fn delete_expense(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/expenses/{}", id))
    }

    pub fn incomes(&self) -> Result<Vec<Income>, ApiError> {
        self.get("/incomes")
    }

    pub fn create_income(&self, income: &NewIncome) -> Result<Income, ApiError> {
        let path = "/incomes";
        self.send(
            path,
            self.request(Method::POST, path)
                .json(&json!({ "income": income })),
        )
    }

    pub fn income(&self, id: i64) -> Result<Income, ApiError> {
        self.get(&format!("/incomes/{}", id))
    }

    pub fn update_income(&self, id: i64, income: &NewIncome) -> Result<Income, ApiError> {
        self.patch(&format!("/incomes/{}", id), &json!({ "income": income }))
    }

    pub fn delete_income(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/incomes/{}", id))
    }

    /// Categories, expenses and incomes fetched back to back, for handing to
    /// the aggregation functions as one consistent input.
    pub fn snapshot(&self, month: Option<YearMonth>) -> Result<Snapshot, ApiError> {
        Ok(Snapshot {
            categories: self.categories()?,
            expenses: self.expenses(month)?,
            incomes: self.incomes()?,
        })
    }

    pub fn monthly_reviews(&self) -> Result<Vec<MonthlyReview>, ApiError> {
        self.get("/monthly_reviews")
    }

    pub fn review_by_month_code(&self, code: &str) -> Result<MonthlyReview, ApiError> {
        self.get(&format!("/monthly_reviews/by_month_code/{}", code))
    }

    pub fn start_review(&self, month: YearMonth) -> Result<MonthlyReview, ApiError> {
        let path = "/monthly_reviews";
        self.send(
            path,
            self.request(Method::POST, path)
                .json(&json!({ "month": month.first_day() })),
        )
    }

    pub fn update_review(
        &self,
        id: i64,
        notes: Option<&str>,
        completed: Option<bool>,
    ) -> Result<MonthlyReview, ApiError> {
        let path = format!("/monthly_reviews/{}", id);
        let mut body = serde_json::Map::new();
        body.insert("notes".into(), json!(notes));
        if let Some(c) = completed {
            body.insert("completed".into(), json!(c));
        }
        self.send(
            &path,
            self.request(Method::PATCH, &path).json(&Value::Object(body)),
        )
    }

    pub fn rebuild_review(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/monthly_reviews/{}/rebuild", id);
        self.send_raw(&path, self.request(Method::POST, &path))
            .map(|_| ())
    }

    pub fn update_category_review(&self, id: i64, marks: &CategoryMarks) -> Result<(), ApiError> {
        let path = format!("/monthly_category_reviews/{}", id);
        self.send_raw(
            &path,
            self.request(Method::PATCH, &path)
                .json(&json!({ "monthly_category_review": marks })),
        )
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_errors_list() {
        let m = error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors":["Name can't be blank","Amount is not a number"]}"#,
        );
        assert_eq!(m, "Name can't be blank, Amount is not a number");
    }

    #[test]
    fn error_message_falls_back() {
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, r#"{"error":"Not Authorized"}"#),
            "Not Authorized"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"message":"missing"}"#),
            "missing"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>"),
            "Internal Server Error"
        );
    }

    #[test]
    fn unauthorized_is_detectable() {
        let e = ApiError::Status {
            path: "/expenses".into(),
            status: StatusCode::UNAUTHORIZED,
            message: "Not Authorized".into(),
        };
        assert!(e.is_unauthorized());
        assert!(!ApiError::MissingToken("/login".into()).is_unauthorized());
    }
}
