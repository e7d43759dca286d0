//! The landing page and the OAuth redirect relay.
//!
//! The provider puts the token in the URL fragment, which never reaches
//! the server, so `/callback` serves a page whose script posts
//! `location.hash` to `/api/auth/callback` and follows the redirect.

use axum::http::header;
use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Vantage</title></head>
<body>
<h1>Vantage</h1>
<ul>
<li><a href="/api/widgets">Widgets</a></li>
<li><a href="/api/auth/status">Music connection</a></li>
<li><a href="/api/auth/login">Music login URL</a></li>
</ul>
</body>
</html>
"#;

const CALLBACK_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Signing in</title></head>
<body>
<p>Signing in...</p>
<script src="/callback.js"></script>
</body>
</html>
"#;

const CALLBACK_JS: &str = r#"(function () {
  var home = function (target) { window.location.replace(target || "/"); };
  fetch("/api/auth/callback", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ fragment: window.location.hash })
  })
    .then(function (res) { return res.json(); })
    .then(function (outcome) { home(outcome.redirect); })
    .catch(function () { home("/"); });
})();
"#;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn callback() -> Html<&'static str> {
    Html(CALLBACK_HTML)
}

pub async fn callback_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        CALLBACK_JS,
    )
}
