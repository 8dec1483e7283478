//! Endpoint inventory
//!
//! Every remote operation the crate calls, with its path relative to the
//! client's base URL.

/// HTTP shape of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    GetJson,
    PostJson,
    PostMultipart,
}

/// A remote WeChat operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Code2Session,
    GetAccessToken,
    GetPaidUnionId,
    DailyRetain,
    WeeklyRetain,
    MonthlyRetain,
    DailySummary,
    DailyVisitTrend,
    WeeklyVisitTrend,
    MonthlyVisitTrend,
    UserPortrait,
    VisitDistribution,
    VisitPage,
    UploadTempMedia,
    ImgSecCheck,
    MsgSecCheck,
}

impl Endpoint {
    pub const ALL: [Endpoint; 16] = [
        Endpoint::Code2Session,
        Endpoint::GetAccessToken,
        Endpoint::GetPaidUnionId,
        Endpoint::DailyRetain,
        Endpoint::WeeklyRetain,
        Endpoint::MonthlyRetain,
        Endpoint::DailySummary,
        Endpoint::DailyVisitTrend,
        Endpoint::WeeklyVisitTrend,
        Endpoint::MonthlyVisitTrend,
        Endpoint::UserPortrait,
        Endpoint::VisitDistribution,
        Endpoint::VisitPage,
        Endpoint::UploadTempMedia,
        Endpoint::ImgSecCheck,
        Endpoint::MsgSecCheck,
    ];

    /// Name used in the WeChat documentation
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Code2Session => "auth.code2Session",
            Endpoint::GetAccessToken => "auth.getAccessToken",
            Endpoint::GetPaidUnionId => "auth.getPaidUnionId",
            Endpoint::DailyRetain => "analysis.getDailyRetain",
            Endpoint::WeeklyRetain => "analysis.getWeeklyRetain",
            Endpoint::MonthlyRetain => "analysis.getMonthlyRetain",
            Endpoint::DailySummary => "analysis.getDailySummary",
            Endpoint::DailyVisitTrend => "analysis.getDailyVisitTrend",
            Endpoint::WeeklyVisitTrend => "analysis.getWeeklyVisitTrend",
            Endpoint::MonthlyVisitTrend => "analysis.getMonthlyVisitTrend",
            Endpoint::UserPortrait => "analysis.getUserPortrait",
            Endpoint::VisitDistribution => "analysis.getVisitDistribution",
            Endpoint::VisitPage => "analysis.getVisitPage",
            Endpoint::UploadTempMedia => "customerServiceMessage.uploadTempMedia",
            Endpoint::ImgSecCheck => "security.imgSecCheck",
            Endpoint::MsgSecCheck => "security.msgSecCheck",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Code2Session => "/sns/jscode2session",
            Endpoint::GetAccessToken => "/cgi-bin/token",
            Endpoint::GetPaidUnionId => "/wxa/getpaidunionid",
            Endpoint::DailyRetain => "/datacube/getweanalysisappiddailyretaininfo",
            Endpoint::WeeklyRetain => "/datacube/getweanalysisappidweeklyretaininfo",
            Endpoint::MonthlyRetain => "/datacube/getweanalysisappidmonthlyretaininfo",
            Endpoint::DailySummary => "/datacube/getweanalysisappiddailysummarytrend",
            Endpoint::DailyVisitTrend => "/datacube/getweanalysisappiddailyvisittrend",
            Endpoint::WeeklyVisitTrend => "/datacube/getweanalysisappidweeklyvisittrend",
            Endpoint::MonthlyVisitTrend => "/datacube/getweanalysisappidmonthlyvisittrend",
            Endpoint::UserPortrait => "/datacube/getweanalysisappiduserportrait",
            Endpoint::VisitDistribution => "/datacube/getweanalysisappidvisitdistribution",
            Endpoint::VisitPage => "/datacube/getweanalysisappidvisitpage",
            Endpoint::UploadTempMedia => "/cgi-bin/media/upload",
            Endpoint::ImgSecCheck => "/wxa/img_sec_check",
            Endpoint::MsgSecCheck => "/wxa/msg_sec_check",
        }
    }

    pub fn transport(self) -> Transport {
        match self {
            Endpoint::Code2Session | Endpoint::GetAccessToken | Endpoint::GetPaidUnionId => {
                Transport::GetJson
            }
            Endpoint::UploadTempMedia | Endpoint::ImgSecCheck => Transport::PostMultipart,
            _ => Transport::PostJson,
        }
    }

    /// Whether the path takes an `access_token` query parameter added by the caller.
    pub fn needs_access_token(self) -> bool {
        !matches!(self, Endpoint::Code2Session | Endpoint::GetAccessToken)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_paths_are_unique_and_rooted() {
        let mut seen = HashSet::new();
        for endpoint in Endpoint::ALL {
            assert!(endpoint.path().starts_with('/'), "{endpoint}");
            assert!(!endpoint.path().contains('?'), "{endpoint}");
            assert!(seen.insert(endpoint.path()), "duplicate path for {endpoint}");
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = Endpoint::ALL.iter().map(|e| e.name()).collect();
        assert_eq!(names.len(), Endpoint::ALL.len());
    }

    #[test]
    fn test_transport_classification() {
        assert_eq!(Endpoint::Code2Session.transport(), Transport::GetJson);
        assert_eq!(Endpoint::DailyRetain.transport(), Transport::PostJson);
        assert_eq!(Endpoint::UploadTempMedia.transport(), Transport::PostMultipart);
        assert!(!Endpoint::GetAccessToken.needs_access_token());
        assert!(Endpoint::GetPaidUnionId.needs_access_token());
    }
}
