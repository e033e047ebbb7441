use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::{Body, Client};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};

pub(crate) type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Idle pooled connections are closed after this
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

fn bundled_roots() -> RootCertStore {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));
    roots
}

fn tls_config() -> ClientConfig {
    ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(bundled_roots())
        .with_no_client_auth()
}

/// Client trusting the bundled webpki roots. `http://` stays allowed for
/// local OpenAI-compatible servers set as `base_url`.
pub(crate) fn build_https_client() -> HyperClient {
    let connector = HttpsConnectorBuilder::new()
        .with_tls_config(tls_config())
        .https_or_http()
        .enable_http1()
        .build();

    Client::builder()
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .build::<_, Body>(connector)
}
