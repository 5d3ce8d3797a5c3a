use fxhash::FxHashMap;

use crate::controller::{Attribute, AttributesController, Category};
use crate::graph::Admin;
use crate::leg::TripLeg;

/// Deduplicates admin descriptors to dense indices, preserving the order of
/// first reference.
#[derive(Default)]
pub struct AdminInterner {
    indices: FxHashMap<Admin, u32>,
    list: Vec<Admin>,
}

impl AdminInterner {
    pub fn new() -> AdminInterner {
        AdminInterner::default()
    }

    pub fn index_of(&mut self, admin: &Admin) -> u32 {
        if let Some(index) = self.indices.get(admin) {
            return *index;
        }
        let index = self.list.len() as u32;
        self.list.push(admin.clone());
        self.indices.insert(admin.clone(), index);
        index
    }

    pub fn into_list(self) -> Vec<Admin> {
        self.list
    }
}

/// Copies the interned admin list onto the leg, field by gated field.
pub fn assign_admins(controller: &AttributesController, leg: &mut TripLeg, admins: Vec<Admin>) {
    if !controller.category_enabled(Category::Admin) {
        return;
    }
    for admin in admins {
        let mut leg_admin = Admin::default();
        if controller.enabled(Attribute::AdminCountryCode) {
            leg_admin.country_code = admin.country_code;
        }
        if controller.enabled(Attribute::AdminCountryText) {
            leg_admin.country_text = admin.country_text;
        }
        if controller.enabled(Attribute::AdminStateCode) {
            leg_admin.state_code = admin.state_code;
        }
        if controller.enabled(Attribute::AdminStateText) {
            leg_admin.state_text = admin.state_text;
        }
        leg.admins.push(leg_admin);
    }
}
