//! Robots.txt rules for one origin
//!
//! Allow/Disallow matching is delegated to the robotstxt crate; the
//! Crawl-delay extension is read directly from the file.

use robotstxt::DefaultMatcher;
use std::time::Duration;
use url::Url;

/// Parsed robots.txt rules bound to one user-agent token
#[derive(Debug, Clone)]
pub struct RobotsRules {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Product token matched against `User-agent` lines
    agent: String,
}

impl RobotsRules {
    /// Creates rules from raw robots.txt content
    pub fn from_content(content: &str, agent: &str) -> Self {
        Self {
            content: content.to_string(),
            agent: agent.to_string(),
        }
    }

    /// Permissive rules, used when robots.txt is missing or unreadable
    pub fn allow_all(agent: &str) -> Self {
        Self::from_content("", agent)
    }

    /// Checks whether the URL may be fetched
    pub fn is_allowed(&self, url: &Url) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, &self.agent, url.as_str())
    }

    /// Crawl-delay for this agent, preferring its own group over `*`
    pub fn crawl_delay(&self) -> Option<Duration> {
        let agent = self.agent.to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut in_rules = false;
        let mut for_agent = None;
        let mut for_wildcard = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if in_rules {
                        group.clear();
                        in_rules = false;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_rules = true;
                    let Ok(seconds) = value.parse::<f64>() else {
                        continue;
                    };
                    if !seconds.is_finite() || seconds < 0.0 {
                        continue;
                    }
                    if group
                        .iter()
                        .any(|ua| !ua.is_empty() && ua != "*" && agent.contains(ua.as_str()))
                    {
                        for_agent = Some(seconds);
                    } else if group.iter().any(|ua| ua == "*") {
                        for_wildcard = Some(seconds);
                    }
                }
                _ => in_rules = true,
            }
        }

        for_agent.or(for_wildcard).map(Duration::from_secs_f64)
    }
}
