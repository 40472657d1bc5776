use crate::adapter::BackendFailure;
use crate::element::MediaElement;
use crate::embed::EmbedChannel;
use std::fmt::Debug;
use url::Url;

/// Creates the host objects a session's backend wraps.
///
/// A browser host hands out DOM elements and iframe player handles; headless
/// hosts may refuse and let the caller fall back to a timer-driven backend.
pub trait MediaHost: Debug {
    fn create_element(
        &mut self,
        src: &Url,
    ) -> Result<Box<dyn MediaElement>, BackendFailure>;

    fn create_embed(
        &mut self,
        provider: &str,
        video_id: &str,
    ) -> Result<Box<dyn EmbedChannel>, BackendFailure>;
}
