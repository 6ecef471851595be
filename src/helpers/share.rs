//! Social share links for a post

use serde::Serialize;

use super::url::encode_component;

/// A share target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub network: &'static str,
    pub label: &'static str,
    pub href: String,
}

/// Share URLs for Twitter, Facebook, LinkedIn and KakaoStory
pub fn share_links(title: &str, url: &str) -> Vec<ShareLink> {
    let title = encode_component(title);
    let url = encode_component(url);

    vec![
        ShareLink {
            network: "twitter",
            label: "Twitter",
            href: format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                title, url
            ),
        },
        ShareLink {
            network: "facebook",
            label: "Facebook",
            href: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
        },
        ShareLink {
            network: "linkedin",
            label: "LinkedIn",
            href: format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}",
                url
            ),
        },
        ShareLink {
            network: "kakao",
            label: "KakaoStory",
            href: format!("https://story.kakao.com/share?url={}", url),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_links_are_encoded() {
        let links = share_links("Notion & Rust", "https://blog.example.com/blog/a b");
        assert_eq!(links.len(), 4);
        assert_eq!(
            links[0].href,
            "https://twitter.com/intent/tweet?text=Notion%20%26%20Rust&url=https%3A%2F%2Fblog.example.com%2Fblog%2Fa%20b"
        );
        assert!(links
            .iter()
            .skip(1)
            .all(|l| l.href.ends_with("https%3A%2F%2Fblog.example.com%2Fblog%2Fa%20b")));
    }
}
