//! Route table and navigation guard.
//!
//! Destinations map to an explicit access policy, and a single `resolve`
//! function applies it. Consumers re-query the session gate at every
//! navigation decision point; there is no cached or reactive auth state.

/// Named destinations exposed to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Public landing screen.
    Home,
    /// Public, but an already-authenticated visitor is sent on to the
    /// default protected destination instead of seeing the form again.
    Login,
    /// Protected; requires a valid session.
    Dashboard,
}

/// Where a successful sign-in (or an authenticated visit to the login
/// screen) lands.
pub const DEFAULT_PROTECTED: Destination = Destination::Dashboard;

/// Access policy for one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    RequiresAuth { fallback: Destination },
    RedirectIfAuthenticated { target: Destination },
}

/// The route table.
pub fn access(destination: Destination) -> Access {
    match destination {
        Destination::Home => Access::Public,
        Destination::Login => Access::RedirectIfAuthenticated {
            target: DEFAULT_PROTECTED,
        },
        Destination::Dashboard => Access::RequiresAuth {
            fallback: Destination::Login,
        },
    }
}

/// Decide where a navigation request actually lands.
///
/// A denied protected request is redirected to its fallback and the
/// originally requested destination is discarded; there is no
/// return-after-login memory.
pub fn resolve(requested: Destination, authenticated: bool) -> Destination {
    match access(requested) {
        Access::Public => requested,
        Access::RequiresAuth { fallback } => {
            if authenticated {
                requested
            } else {
                fallback
            }
        }
        Access::RedirectIfAuthenticated { target } => {
            if authenticated {
                target
            } else {
                requested
            }
        }
    }
}

impl Destination {
    pub fn title(self) -> &'static str {
        match self {
            Destination::Home => "Home",
            Destination::Login => "Login",
            Destination::Dashboard => "Dashboard",
        }
    }
}
