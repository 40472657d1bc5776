use gatecast_model::Route;
use std::fmt::Debug;
use url::Url;

/// Routing collaborator the funnel hands control to once a gate completes.
pub trait Navigator: Debug {
    fn navigate(&mut self, route: &Route);

    /// Open an external link, typically in a new tab.
    fn open_link(&mut self, url: &Url);
}
