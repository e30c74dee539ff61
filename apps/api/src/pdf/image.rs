//! Profile photo download and decoding.
//!
//! Fetching happens on the async side before composition; decoding is cheap
//! enough at the capped size to run inline. Every failure degrades to `None`
//! so the composer falls back to the initial box.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{redirect, Client};
use thiserror::Error;
use tracing::{debug, warn};
use url::{Host, Url};

use crate::pdf::document::RasterImage;

/// Longest side, in pixels, of an embedded photo.
pub const MAX_PHOTO_DIMENSION: u32 = 400;
/// Downloads larger than this are abandoned.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
const MAX_REDIRECTS: usize = 3;

#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("unsupported image url: {0}")]
    UnsupportedUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("refusing to fetch from non-public address {0}")]
    ForbiddenHost(String),

    #[error("could not resolve image host: {0}")]
    Resolve(#[from] std::io::Error),

    #[error("image server returned status {0}")]
    Status(u16),

    #[error("image exceeds the 5 MiB limit")]
    TooLarge,

    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Downloads photos named by user-supplied URLs. Only public addresses are
/// contacted, apart from `trusted_hosts` (the blob store's own endpoint).
#[derive(Clone)]
pub struct ImageFetcher {
    client: Client,
    trusted_hosts: Arc<Vec<String>>,
}

impl ImageFetcher {
    pub fn new(timeout: Duration, trusted_hosts: Vec<String>) -> Self {
        let trusted_hosts: Arc<Vec<String>> = Arc::new(
            trusted_hosts
                .into_iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .collect(),
        );
        let policy_hosts = trusted_hosts.clone();
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if literal_host_allowed(attempt.url(), &policy_hosts) {
                attempt.follow()
            } else {
                attempt.error("redirect to a non-public address")
            }
        });
        let client = Client::builder()
            .timeout(timeout)
            .redirect(policy)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to an HTTP client without redirects for image fetch");
                Client::builder()
                    .redirect(redirect::Policy::none())
                    .build()
                    .unwrap_or_default()
            });
        Self {
            client,
            trusted_hosts,
        }
    }

    /// Downloads and decodes the photo at `url`. Failures are logged and yield `None`.
    pub async fn fetch(&self, url: &str) -> Option<RasterImage> {
        match self.try_fetch(url).await {
            Ok(image) => {
                debug!(url, width = image.width, height = image.height, "Fetched profile photo");
                Some(image)
            }
            Err(e) => {
                warn!(url, error = %e, "Profile photo unavailable, using initial");
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<RasterImage, ImageFetchError> {
        let trimmed = url.trim();
        let parsed = Url::parse(trimmed)
            .map_err(|_| ImageFetchError::UnsupportedUrl(trimmed.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ImageFetchError::UnsupportedUrl(trimmed.to_string()));
        }
        self.ensure_public(&parsed).await?;

        let mut response = self.client.get(trimmed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::Status(status.as_u16()));
        }
        if response
            .content_length()
            .is_some_and(|len| len as usize > MAX_PHOTO_BYTES)
        {
            return Err(ImageFetchError::TooLarge);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > MAX_PHOTO_BYTES {
                return Err(ImageFetchError::TooLarge);
            }
            body.extend_from_slice(&chunk);
        }
        decode_photo(&body)
    }
}

impl ImageFetcher {
    /// Rejects URLs whose host is, or resolves to, a loopback, private,
    /// link-local or otherwise non-routable address.
    async fn ensure_public(&self, url: &Url) -> Result<(), ImageFetchError> {
        if is_trusted(url, &self.trusted_hosts) {
            return Ok(());
        }
        let addrs: Vec<IpAddr> = match url.host() {
            Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
            Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
            Some(Host::Domain(name)) => {
                let port = url.port_or_known_default().unwrap_or(80);
                tokio::net::lookup_host((name, port))
                    .await?
                    .map(|addr| addr.ip())
                    .collect()
            }
            None => return Err(ImageFetchError::UnsupportedUrl(url.to_string())),
        };
        match addrs.into_iter().find(|ip| !is_public_ip(*ip)) {
            Some(ip) => Err(ImageFetchError::ForbiddenHost(ip.to_string())),
            None => Ok(()),
        }
    }
}

fn is_trusted(url: &Url, trusted_hosts: &[String]) -> bool {
    url.host_str()
        .map(|host| host.trim_matches(|c| c == '[' || c == ']'))
        .is_some_and(|host| trusted_hosts.iter().any(|t| t.eq_ignore_ascii_case(host)))
}

/// Synchronous check used for redirects: trusted hosts pass, IP literals must
/// be public and `localhost` is refused. Other names are not resolved here.
fn literal_host_allowed(url: &Url, trusted_hosts: &[String]) -> bool {
    if is_trusted(url, trusted_hosts) {
        return true;
    }
    match url.host() {
        Some(Host::Ipv4(ip)) => is_public_ip(IpAddr::V4(ip)),
        Some(Host::Ipv6(ip)) => is_public_ip(IpAddr::V6(ip)),
        Some(Host::Domain(name)) => {
            let name = name.trim_end_matches('.').to_ascii_lowercase();
            name != "localhost" && !name.ends_with(".localhost")
        }
        None => false,
    }
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || v4.is_multicast()
                || a == 0
                // 100.64.0.0/10 carrier-grade NAT
                || (a == 100 && (b & 0xC0) == 64))
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public_ip(IpAddr::V4(v4));
            }
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_multicast()
                // fc00::/7 unique local
                || (first & 0xFE00) == 0xFC00
                // fe80::/10 link local
                || (first & 0xFFC0) == 0xFE80)
        }
    }
}

/// Decodes PNG or JPEG bytes into RGB pixels no larger than [`MAX_PHOTO_DIMENSION`].
pub fn decode_photo(bytes: &[u8]) -> Result<RasterImage, ImageFetchError> {
    let decoded = image::load_from_memory(bytes)?;
    let fitted = if decoded.width() > MAX_PHOTO_DIMENSION || decoded.height() > MAX_PHOTO_DIMENSION {
        decoded.thumbnail(MAX_PHOTO_DIMENSION, MAX_PHOTO_DIMENSION)
    } else {
        decoded
    };
    let rgb = fitted.to_rgb8();
    Ok(RasterImage {
        width: rgb.width(),
        height: rgb.height(),
        rgb: rgb.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 10, 10])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn test_decode_small_png() {
        let image = decode_photo(&png(4, 3)).unwrap();
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(image.rgb.len(), 4 * 3 * 3);
        assert_eq!(&image.rgb[..3], &[200, 10, 10]);
    }

    #[test]
    fn test_decode_downscales_large_image() {
        let image = decode_photo(&png(800, 400)).unwrap();
        assert_eq!(image.width, 400);
        assert_eq!(image.height, 200);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_photo(b"not an image"), Err(ImageFetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_non_http_url_yields_none() {
        let fetcher = ImageFetcher::new(Duration::from_secs(1), Vec::new());
        assert!(fetcher.fetch("ftp://example.com/me.png").await.is_none());
        assert!(fetcher.fetch("").await.is_none());
    }

    #[tokio::test]
    async fn test_private_addresses_refused() {
        let fetcher = ImageFetcher::new(Duration::from_secs(1), Vec::new());
        for url in [
            "http://127.0.0.1/me.png",
            "http://169.254.169.254/latest/meta-data",
            "http://10.0.0.7:8080/me.png",
            "http://192.168.1.1/me.png",
            "http://[::1]/me.png",
            "http://[fe80::1]/me.png",
            "http://[::ffff:127.0.0.1]/me.png",
        ] {
            let err = fetcher.try_fetch(url).await.unwrap_err();
            assert!(matches!(err, ImageFetchError::ForbiddenHost(_)), "{url}: {err}");
        }
    }

    #[test]
    fn test_public_ip_classification() {
        assert!(is_public_ip("93.184.216.34".parse().unwrap()));
        assert!(is_public_ip("2606:2800:220:1::1".parse().unwrap()));
        assert!(!is_public_ip("100.64.0.1".parse().unwrap()));
        assert!(!is_public_ip("0.0.0.0".parse().unwrap()));
        assert!(!is_public_ip("fd00::1".parse().unwrap()));
    }

    #[test]
    fn test_redirect_targets() {
        let trusted = vec!["minio".to_string()];
        let allowed = |u: &str| literal_host_allowed(&Url::parse(u).unwrap(), &trusted);
        assert!(allowed("https://cdn.example.com/a.png"));
        assert!(allowed("http://minio:9000/bucket/a.png"));
        assert!(!allowed("http://localhost/a.png"));
        assert!(!allowed("http://127.0.0.1/a.png"));
        assert!(!allowed("http://[::1]/a.png"));
    }

    #[tokio::test]
    async fn test_trusted_host_skips_address_check() {
        let fetcher = ImageFetcher::new(Duration::from_millis(200), vec!["127.0.0.1".into()]);
        let url = Url::parse("http://127.0.0.1:9/me.png").unwrap();
        assert!(fetcher.ensure_public(&url).await.is_ok());
    }
}
