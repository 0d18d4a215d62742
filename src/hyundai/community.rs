//! Fallback for platforms outside the parameter table.
use std::collections::HashMap;

use crate::hyundai::CarSpecs;

/// Source of physical parameters for platforms only known to the community port list.
pub trait CommunityProvider {
    fn specs(&self, name: &str) -> Option<CarSpecs>;
}

/// Knows no platforms. Unknown candidates keep the conservative defaults.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCommunity;

impl CommunityProvider for NoCommunity {
    fn specs(&self, _name: &str) -> Option<CarSpecs> {
        None
    }
}

impl CommunityProvider for HashMap<String, CarSpecs> {
    fn specs(&self, name: &str) -> Option<CarSpecs> {
        self.get(name).copied()
    }
}

impl<T: CommunityProvider + ?Sized> CommunityProvider for &T {
    fn specs(&self, name: &str) -> Option<CarSpecs> {
        (**self).specs(name)
    }
}
