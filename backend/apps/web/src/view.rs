//! HTML views
//!
//! Plain string rendering. Everything interpolated from users or upstream
//! services goes through [`escape`].

use std::fmt::Write;

/// Navigation entries drawn by the authenticated chrome: `(path, key)`
const NAV_LINKS: &[(&str, &str)] = &[
    ("/dashboard", "nav.dashboard"),
    ("/footprintlog", "nav.footprintlog"),
    ("/marketplace", "nav.marketplace"),
    ("/projects", "nav.projects"),
    ("/community", "nav.community"),
    ("/settings", "nav.settings"),
];

/// Navigation chrome, already translated
#[derive(Debug, Clone)]
pub struct Chrome {
    pub user_name: String,
    pub links: Vec<(&'static str, String)>,
    pub logout_label: String,
}

impl Chrome {
    pub fn new(user_name: &str, translate: impl Fn(&str) -> String) -> Self {
        Self {
            user_name: user_name.to_string(),
            links: NAV_LINKS
                .iter()
                .map(|(path, key)| (*path, translate(key)))
                .collect(),
            logout_label: translate("nav.logout"),
        }
    }

    fn render(&self, current: &str) -> String {
        let mut nav = String::from("<nav class=\"app-nav\"><ul>");
        for (path, label) in &self.links {
            let active = if current == *path || current.starts_with(&format!("{path}/")) {
                " class=\"active\""
            } else {
                ""
            };
            let _ = write!(nav, "<li><a href=\"{path}\"{active}>{}</a></li>", escape(label));
        }
        let _ = write!(
            nav,
            "</ul><span class=\"user\">{}</span>\
             <form method=\"post\" action=\"/logout\"><button type=\"submit\">{}</button></form></nav>",
            escape(&self.user_name),
            escape(&self.logout_label),
        );
        nav
    }
}

/// Everything a page needs besides its own body
#[derive(Debug, Clone)]
pub struct PageFrame {
    pub language: String,
    pub dark: bool,
    pub path: String,
    pub app_name: String,
    pub chrome: Option<Chrome>,
}

impl PageFrame {
    pub fn render(&self, title: &str, body: &str) -> String {
        let main = match &self.chrome {
            Some(chrome) => format!(
                "{}<main class=\"with-layout\">{body}</main>",
                chrome.render(&self.path)
            ),
            None => format!("<main>{body}</main>"),
        };
        document(&self.language, self.dark, &format!("{title} · {}", self.app_name), &main, None)
    }
}

/// Full HTML document
///
/// `refresh_secs` adds a meta refresh, used by the loading screen.
pub fn document(
    language: &str,
    dark: bool,
    title: &str,
    body: &str,
    refresh_secs: Option<u32>,
) -> String {
    let class = if dark { "dark" } else { "light" };
    let refresh = refresh_secs
        .map(|secs| format!("<meta http-equiv=\"refresh\" content=\"{secs}\">"))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\
         <html lang=\"{}\" class=\"{class}\">\
         <head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         {refresh}<title>{}</title></head>\
         <body>{body}</body></html>",
        escape(language),
        escape(title),
    )
}

/// Full-page loading indicator that re-requests the page
pub fn loading(language: &str, dark: bool, message: &str) -> String {
    let body = format!(
        "<div class=\"loading\" role=\"status\" aria-live=\"polite\">\
         <div class=\"spinner\"></div><p>{}</p></div>",
        escape(message)
    );
    document(language, dark, message, &body, Some(1))
}

/// Blocked-account screen
pub fn blocked(language: &str, dark: bool, title: &str, message: &str) -> String {
    let body = format!(
        "<section class=\"blocked\"><h1>{}</h1><p>{}</p></section>",
        escape(title),
        escape(message)
    );
    document(language, dark, title, &body, None)
}

/// Error-boundary fallback with a retry link back to the same page
pub fn error_fallback(message: &str, retry: &str) -> String {
    let body = format!(
        "<section class=\"error\"><h1>{}</h1><p><a href=\"\">{}</a></p></section>",
        escape(message),
        escape(retry)
    );
    document("en", false, message, &body, None)
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
