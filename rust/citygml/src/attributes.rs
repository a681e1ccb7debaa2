// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Descriptive building metadata
//!
//! Every field is optional. A present field produces exactly one element in
//! the written document; an absent one produces nothing (no defaults are
//! substituted).

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Building attributes (CityGML `bldg:` properties)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildingAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(alias = "year_of_construction", skip_serializing_if = "Option::is_none")]
    pub year_of_construction: Option<i32>,
    #[serde(alias = "storeys_above_ground", skip_serializing_if = "Option::is_none")]
    pub storeys_above_ground: Option<u32>,
    #[serde(alias = "storeys_below_ground", skip_serializing_if = "Option::is_none")]
    pub storeys_below_ground: Option<u32>,
    /// Height in meters
    #[serde(alias = "measured_height", skip_serializing_if = "Option::is_none")]
    pub measured_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl BuildingAttributes {
    /// Parse attributes from a JSON object; unknown keys are ignored
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Postal address (serialized as xAL)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(alias = "postal_code", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}
