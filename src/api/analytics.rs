//! Analytics API
//!
//! The `datacube` endpoints. All take a `begin_date` / `end_date` pair in
//! `yyyymmdd` format as a JSON body.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::endpoint::Endpoint;
use super::{WechatApi, WechatContext};
use crate::client::WechatClient;
use crate::error::WechatError;

#[non_exhaustive]
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsDateRangeRequest {
    /// Start date, `yyyymmdd`
    pub begin_date: String,
    /// End date, `yyyymmdd`
    pub end_date: String,
}

impl AnalyticsDateRangeRequest {
    pub fn new(begin_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            begin_date: begin_date.into(),
            end_date: end_date.into(),
        }
    }
}

/// One retention bucket.
///
/// `key` 0 is the reference period itself; `key` n is n days (weeks, months)
/// later. `value` is new/active users for key 0 and retained users otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetainItem {
    pub key: i32,
    pub value: i64,
}

/// Daily, weekly and monthly retention share this shape.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetainResponse {
    /// `20170313`, `20170306-20170312` or `201702` depending on the period
    #[serde(default)]
    pub ref_date: String,
    /// Retention of new users
    #[serde(default)]
    pub visit_uv_new: Vec<RetainItem>,
    /// Retention of active users
    #[serde(default)]
    pub visit_uv: Vec<RetainItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DailySummaryItem {
    #[serde(default)]
    pub ref_date: String,
    /// Cumulative users
    #[serde(default)]
    pub visit_total: i64,
    #[serde(default)]
    pub share_pv: i64,
    #[serde(default)]
    pub share_uv: i64,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DailySummaryResponse {
    #[serde(default)]
    pub list: Vec<DailySummaryItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VisitTrendItem {
    #[serde(default)]
    pub ref_date: String,
    #[serde(default)]
    pub session_cnt: i64,
    #[serde(default)]
    pub visit_pv: i64,
    #[serde(default)]
    pub visit_uv: i64,
    #[serde(default)]
    pub visit_uv_new: i64,
    /// Average stay per user, seconds
    #[serde(default)]
    pub stay_time_uv: f64,
    /// Average stay per session, seconds
    #[serde(default)]
    pub stay_time_session: f64,
    #[serde(default)]
    pub visit_depth: f64,
}

/// Daily, weekly and monthly visit trends share this shape.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VisitTrendResponse {
    #[serde(default)]
    pub list: Vec<VisitTrendItem>,
}

/// Response kept as raw JSON for endpoints without a modelled schema.
///
/// `extra` holds the data fields only; the `errcode` / `errmsg` envelope is
/// stripped on decode.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(from = "HashMap<String, Value>")]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl From<HashMap<String, Value>> for AnalyticsResponse {
    fn from(mut extra: HashMap<String, Value>) -> Self {
        extra.remove("errcode");
        extra.remove("errmsg");
        Self { extra }
    }
}

pub struct AnalyticsApi {
    context: Arc<WechatContext>,
}

impl AnalyticsApi {
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    pub async fn get_daily_retain(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<RetainResponse, WechatError> {
        self.post_datacube(Endpoint::DailyRetain, access_token, request)
            .await
    }

    pub async fn get_weekly_retain(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<RetainResponse, WechatError> {
        self.post_datacube(Endpoint::WeeklyRetain, access_token, request)
            .await
    }

    pub async fn get_monthly_retain(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<RetainResponse, WechatError> {
        self.post_datacube(Endpoint::MonthlyRetain, access_token, request)
            .await
    }

    pub async fn get_daily_summary(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<DailySummaryResponse, WechatError> {
        self.post_datacube(Endpoint::DailySummary, access_token, request)
            .await
    }

    pub async fn get_daily_visit_trend(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<VisitTrendResponse, WechatError> {
        self.post_datacube(Endpoint::DailyVisitTrend, access_token, request)
            .await
    }

    pub async fn get_weekly_visit_trend(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<VisitTrendResponse, WechatError> {
        self.post_datacube(Endpoint::WeeklyVisitTrend, access_token, request)
            .await
    }

    pub async fn get_monthly_visit_trend(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<VisitTrendResponse, WechatError> {
        self.post_datacube(Endpoint::MonthlyVisitTrend, access_token, request)
            .await
    }

    pub async fn get_user_portrait(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<AnalyticsResponse, WechatError> {
        self.post_datacube(Endpoint::UserPortrait, access_token, request)
            .await
    }

    pub async fn get_visit_distribution(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<AnalyticsResponse, WechatError> {
        self.post_datacube(Endpoint::VisitDistribution, access_token, request)
            .await
    }

    pub async fn get_visit_page(
        &self,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<AnalyticsResponse, WechatError> {
        self.post_datacube(Endpoint::VisitPage, access_token, request)
            .await
    }

    async fn post_datacube<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        access_token: &str,
        request: &AnalyticsDateRangeRequest,
    ) -> Result<T, WechatError> {
        WechatError::require("access_token", access_token)?;
        WechatError::require("begin_date", &request.begin_date)?;
        WechatError::require("end_date", &request.end_date)?;

        let path = WechatClient::with_access_token(endpoint.path(), access_token);
        self.context.client.post_json(&path, request).await
    }
}

impl WechatApi for AnalyticsApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "analytics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_response_deserializes() {
        let json = r#"{
            "ref_date": "20170313",
            "visit_uv_new": [{"key": 0, "value": 5464}],
            "visit_uv": [{"key": 0, "value": 55500}, {"key": 1, "value": 1234}]
        }"#;
        let response: RetainResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.ref_date, "20170313");
        assert_eq!(response.visit_uv_new, vec![RetainItem { key: 0, value: 5464 }]);
        assert_eq!(response.visit_uv.len(), 2);
        assert_eq!(response.visit_uv[1].key, 1);
    }

    #[test]
    fn visit_trend_response_deserializes() {
        let json = r#"{"list": [{
            "ref_date": "20170313",
            "session_cnt": 142549,
            "visit_pv": 472351,
            "visit_uv": 55500,
            "visit_uv_new": 5464,
            "stay_time_session": 0,
            "visit_depth": 1.9838
        }]}"#;
        let response: VisitTrendResponse = serde_json::from_str(json).unwrap();
        let item = &response.list[0];
        assert_eq!(item.session_cnt, 142549);
        assert_eq!(item.stay_time_uv, 0.0);
        assert!((item.visit_depth - 1.9838).abs() < f64::EPSILON);
    }

    #[test]
    fn daily_summary_response_deserializes() {
        let json = r#"{"list": [{"ref_date": "20170313", "visit_total": 391, "share_pv": 572, "share_uv": 383}]}"#;
        let response: DailySummaryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.list[0].visit_total, 391);
        assert_eq!(response.list[0].share_uv, 383);
    }

    #[test]
    fn analytics_response_keeps_unmodelled_fields() {
        let json = r#"{"ref_date":"20170313","list":[{"k":"v"}]}"#;
        let response: AnalyticsResponse = serde_json::from_str(json).unwrap();
        assert!(response.extra.contains_key("list"));
        assert_eq!(response.extra["ref_date"], "20170313");
    }

    #[test]
    fn analytics_response_drops_envelope_fields() {
        let response: AnalyticsResponse =
            crate::api::common::decode_response(br#"{"errcode":0,"errmsg":"ok","x":1}"#).unwrap();
        let mut keys: Vec<&str> = response.extra.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["x"]);
        assert_eq!(response.extra["x"], 1);
    }

    #[test]
    fn analytics_date_range_request_serializes() {
        let request = AnalyticsDateRangeRequest::new("20240101", "20240102");
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["begin_date"], "20240101");
        assert_eq!(value["end_date"], "20240102");
    }
}
