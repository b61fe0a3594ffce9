//! Component-side contracts.
//!
//! A pluggable component supplies two views of itself: the declared
//! capability surface (names and call shapes) and the raw implementation
//! index (invocable thunks). The catalog builder joins the two at
//! registration time.

pub mod index;
pub mod surface;

use crate::component::index::MemberIndex;
use crate::component::surface::InterfaceDecl;

/// Contract a concrete component fulfills to be bridged to the host.
pub trait Component {
    /// Name advertised to the host at registration. Also the `source` field
    /// of every contained-failure notification.
    fn component_name(&self) -> &str;

    /// Declared capability interfaces.
    ///
    /// # Contract
    /// - Must return the same interfaces in the same order on every call;
    ///   catalog identifiers are derived from this order.
    fn capability_surface(&self) -> Vec<InterfaceDecl>;

    /// Raw implementation index backing the declared surface.
    ///
    /// # Contract
    /// - Every declared member must appear here under its primary name, or
    ///   registration fails as a whole.
    fn member_index(&self) -> MemberIndex<Self>
    where
        Self: Sized;
}
