//! Role-based permissions.
//!
//! A group holds one [`RuleSet`] per named area, each with view/add/change/delete flags.
//! A user may act if any of their groups allows it, or if they are a superuser.

use std::{any::Any, collections::BTreeMap};

use serde::{Deserialize, Serialize};
use stockroom_states::{State, state_assign_impl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSetName {
    General,
    Admin,
    Part,
    Stock,
    Build,
    PurchaseOrder,
    SalesOrder,
}

impl RuleSetName {
    pub const ALL: [RuleSetName; 7] = [
        Self::General,
        Self::Admin,
        Self::Part,
        Self::Stock,
        Self::Build,
        Self::PurchaseOrder,
        Self::SalesOrder,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Admin => "Admin",
            Self::Part => "Parts",
            Self::Stock => "Stock",
            Self::Build => "Build Orders",
            Self::PurchaseOrder => "Purchase Orders",
            Self::SalesOrder => "Sales Orders",
        }
    }

    /// Database tables covered by this rule set.
    pub fn models(self) -> &'static [&'static str] {
        match self {
            Self::General => &["part_partstar"],
            Self::Admin => &[
                "auth_group",
                "auth_user",
                "auth_permission",
                "authtoken_token",
                "users_ruleset",
            ],
            Self::Part => &[
                "part_part",
                "part_bomitem",
                "part_partcategory",
                "part_partattachment",
                "part_partsellpricebreak",
                "part_parttesttemplate",
                "part_partparametertemplate",
                "part_partparameter",
            ],
            Self::Stock => &[
                "stock_stockitem",
                "stock_stocklocation",
                "stock_stockitemattachment",
                "stock_stockitemtracking",
                "stock_stockitemtestresult",
            ],
            Self::Build => &[
                "part_part",
                "part_partcategory",
                "part_bomitem",
                "build_build",
                "build_builditem",
                "stock_stockitem",
                "stock_stocklocation",
            ],
            Self::PurchaseOrder => &[
                "company_company",
                "part_supplierpart",
                "part_supplierpricebreak",
                "order_purchaseorder",
                "order_purchaseorderattachment",
                "order_purchaseorderlineitem",
            ],
            Self::SalesOrder => &[
                "company_company",
                "order_salesorder",
                "order_salesorderattachment",
                "order_salesorderlineitem",
                "order_salesorderallocation",
            ],
        }
    }

    /// Rule sets covering `model`.
    pub fn covering(model: &str) -> impl Iterator<Item = RuleSetName> + '_ {
        Self::ALL
            .into_iter()
            .filter(move |name| name.models().iter().any(|m| *m == model))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    View,
    Add,
    Change,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub can_view: bool,
    pub can_add: bool,
    pub can_change: bool,
    pub can_delete: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            can_view: true,
            can_add: false,
            can_change: false,
            can_delete: false,
        }
    }
}

impl RuleSet {
    pub const FULL: RuleSet = RuleSet {
        can_view: true,
        can_add: true,
        can_change: true,
        can_delete: true,
    };

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::View => self.can_view,
            Permission::Add => self.can_add,
            Permission::Change => self.can_change,
            Permission::Delete => self.can_delete,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRoles {
    pub name: String,
    pub rulesets: BTreeMap<RuleSetName, RuleSet>,
}

impl GroupRoles {
    /// A group with every rule set present at its default flags.
    pub fn new(name: impl Into<String>) -> Self {
        let mut group = Self {
            name: name.into(),
            rulesets: BTreeMap::new(),
        };
        group.ensure_defaults();
        group
    }

    /// Add any missing rule set with default flags. Existing entries are kept.
    pub fn ensure_defaults(&mut self) {
        for name in RuleSetName::ALL {
            self.rulesets.entry(name).or_default();
        }
    }

    pub fn with(mut self, name: RuleSetName, ruleset: RuleSet) -> Self {
        self.rulesets.insert(name, ruleset);
        self
    }

    pub fn allows(&self, name: RuleSetName, permission: Permission) -> bool {
        self.rulesets
            .get(&name)
            .is_some_and(|ruleset| ruleset.allows(permission))
    }
}

/// Roles of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRoles {
    pub superuser: bool,
    pub groups: Vec<GroupRoles>,
}

impl UserRoles {
    pub fn superuser() -> Self {
        Self {
            superuser: true,
            groups: Vec::new(),
        }
    }

    pub fn with_groups(groups: Vec<GroupRoles>) -> Self {
        Self {
            superuser: false,
            groups,
        }
    }

    pub fn check(&self, name: RuleSetName, permission: Permission) -> bool {
        self.superuser || self.groups.iter().any(|g| g.allows(name, permission))
    }
}

impl State for UserRoles {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
