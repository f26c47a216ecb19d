//! URL building utilities for provider endpoints
//!
//! Base URLs come from `[endpoints]` in the config so every builder takes the
//! base explicitly. Trailing slashes on the base are tolerated.

fn base(api_base: &str) -> &str {
    api_base.trim_end_matches('/')
}

/// Builds the kontests.net listing URL covering every tracked site.
///
/// # Example
/// ```
/// use codefolio::data_fetcher::api::build_kontests_url;
///
/// let url = build_kontests_url("https://kontests.net/");
/// assert_eq!(url, "https://kontests.net/api/v1/all");
/// ```
pub fn build_kontests_url(api_base: &str) -> String {
    format!("{}/api/v1/all", base(api_base))
}

/// Builds the Codeforces contest list URL, excluding gym contests.
///
/// # Example
/// ```
/// use codefolio::data_fetcher::api::build_codeforces_contests_url;
///
/// let url = build_codeforces_contests_url("https://codeforces.com");
/// assert_eq!(url, "https://codeforces.com/api/contest.list?gym=false");
/// ```
pub fn build_codeforces_contests_url(api_base: &str) -> String {
    format!("{}/api/contest.list?gym=false", base(api_base))
}

/// Builds a Codeforces user API URL for `user.info`, `user.rating` or `user.status`.
///
/// `user.info` takes `handles`, the other two take `handle`.
///
/// # Example
/// ```
/// use codefolio::data_fetcher::api::build_codeforces_user_url;
///
/// let url = build_codeforces_user_url("https://codeforces.com", "user.rating", "tourist");
/// assert_eq!(url, "https://codeforces.com/api/user.rating?handle=tourist");
/// ```
pub fn build_codeforces_user_url(api_base: &str, method: &str, handle: &str) -> String {
    let param = if method == "user.info" {
        "handles"
    } else {
        "handle"
    };
    format!("{}/api/{method}?{param}={handle}", base(api_base))
}

/// Builds the GraphQL endpoint URL used for LeetCode contests and profiles.
pub fn build_graphql_url(api_base: &str) -> String {
    format!("{}/graphql", base(api_base))
}

/// Builds the CodeChef contest list URL sorted by start time.
///
/// # Example
/// ```
/// use codefolio::data_fetcher::api::build_codechef_contests_url;
///
/// let url = build_codechef_contests_url("https://www.codechef.com");
/// assert_eq!(
///     url,
///     "https://www.codechef.com/api/list/contests/all?sort_by=START&sorting_order=asc&offset=0&mode=all"
/// );
/// ```
pub fn build_codechef_contests_url(api_base: &str) -> String {
    format!(
        "{}/api/list/contests/all?sort_by=START&sorting_order=asc&offset=0&mode=all",
        base(api_base)
    )
}

/// Builds a URL of the form `{base}/{handle}`, used by the stats mirrors.
pub fn build_handle_url(api_base: &str, handle: &str) -> String {
    format!("{}/{handle}", base(api_base))
}

/// Builds the CodeChef stats URL for a handle.
pub fn build_codechef_profile_url(api_base: &str, handle: &str) -> String {
    format!("{}/handle/{handle}", base(api_base))
}

/// Builds the GeeksforGeeks profile-info URL on the auth API.
pub fn build_geeksforgeeks_auth_url(api_base: &str, handle: &str) -> String {
    format!(
        "{}/api-get/user-profile-info/?handle={handle}",
        base(api_base)
    )
}
