//! DTOs exposed by the directory API endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::advocate::Advocate;
use crate::domain::query::{PageRequest, QueryDescription, ResultPage, Selection};

/// Query parameters accepted by `GET /api/advocates`.
///
/// Every field is kept as raw text so that malformed values degrade to "no
/// filter" or "first page" instead of rejecting the request.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvocatesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_specialty: Option<String>,
}

impl AdvocatesQuery {
    /// Encodes a description and page the way the endpoint expects them.
    pub fn from_parts(query: &QueryDescription, page: PageRequest) -> Self {
        let term = query.term.trim();
        Self {
            page: Some(page.get().to_string()),
            search_term: (!term.is_empty()).then(|| term.to_string()),
            selected_city: Some(query.city.as_param().to_string()),
            selected_specialty: Some(query.specialty.as_param().to_string()),
        }
    }

    pub fn query_description(&self) -> QueryDescription {
        QueryDescription {
            term: self
                .search_term
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            city: Selection::from_param(self.selected_city.as_deref()),
            specialty: Selection::from_param(self.selected_specialty.as_deref()),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_param(self.page.as_deref())
    }
}

/// Successful response of `GET /api/advocates`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AdvocatesResponse {
    /// Advocates on the requested page.
    pub data: Vec<Advocate>,
    /// Number of advocates matching the query across all pages.
    pub total: usize,
}

impl From<ResultPage> for AdvocatesResponse {
    fn from(page: ResultPage) -> Self {
        Self {
            data: page.advocates,
            total: page.total,
        }
    }
}

impl From<AdvocatesResponse> for ResultPage {
    fn from(response: AdvocatesResponse) -> Self {
        ResultPage::new(response.data, response.total)
    }
}

/// Body returned with every non-2xx API status.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CityName, Specialty};

    #[test]
    fn missing_params_mean_first_page_without_filters() {
        let query = AdvocatesQuery::default();
        assert_eq!(query.page_request(), PageRequest::FIRST);
        assert_eq!(query.query_description(), QueryDescription::default());
    }

    #[test]
    fn params_are_trimmed_and_sentinels_dropped() {
        let query = AdvocatesQuery {
            page: Some("2".to_string()),
            search_term: Some("  john ".to_string()),
            selected_city: Some("All".to_string()),
            selected_specialty: Some("Bipolar".to_string()),
        };

        let description = query.query_description();
        assert_eq!(description.term, "john");
        assert!(description.city.is_all());
        assert_eq!(
            description.specialty,
            Selection::Only(Specialty::new("Bipolar").unwrap())
        );
        assert_eq!(query.page_request().get(), 2);
    }

    #[test]
    fn from_parts_round_trips_through_params() {
        let description = QueryDescription::new(
            "Smith",
            Selection::Only(CityName::new("Austin").unwrap()),
            Selection::All,
        );
        let params = AdvocatesQuery::from_parts(&description, PageRequest::new(3));

        assert_eq!(params.selected_specialty.as_deref(), Some("All"));
        assert_eq!(params.query_description(), description);
        assert_eq!(params.page_request().get(), 3);
    }

    #[test]
    fn query_deserializes_camel_case_names() {
        let query: AdvocatesQuery = serde_json::from_value(serde_json::json!({
            "searchTerm": "ann",
            "selectedCity": "Austin",
        }))
        .unwrap();
        assert_eq!(query.search_term.as_deref(), Some("ann"));
        assert_eq!(query.selected_city.as_deref(), Some("Austin"));
        assert!(query.page.is_none());
    }
}
