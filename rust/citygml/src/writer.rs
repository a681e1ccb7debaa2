// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CityGML 2.0 document writer
//!
//! Produces one `CityModel` with a single `cityObjectMember`. Every face of
//! the solid becomes a `gml:Polygon` whose `gml:posList` lists the ring points
//! as `x y z x y z ...` in ring order, using Rust's shortest round-trip float
//! formatting.

use crate::attributes::{Address, BuildingAttributes};
use crate::error::{Error, Result};
use crate::types::{BuildingSolid, LodLevel, Point3D, Solid};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const NAMESPACES: &[(&str, &str)] = &[
    ("xmlns", "http://www.opengis.net/citygml/2.0"),
    ("xmlns:core", "http://www.opengis.net/citygml/2.0"),
    ("xmlns:bldg", "http://www.opengis.net/citygml/building/2.0"),
    ("xmlns:gml", "http://www.opengis.net/gml"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xmlns:xAL", "urn:oasis:names:tc:ciq:xsdschema:xAL:2.0"),
    (
        "xsi:schemaLocation",
        "http://www.opengis.net/citygml/2.0 \
         http://schemas.opengis.net/citygml/2.0/cityGMLBase.xsd \
         http://www.opengis.net/citygml/building/2.0 \
         http://schemas.opengis.net/citygml/building/2.0/building.xsd",
    ),
];

const DEFAULT_LOWER_CORNER: &str = "-180.0 -90.0 0.0";
const DEFAULT_UPPER_CORNER: &str = "180.0 90.0 100.0";

/// How the root `gml:Envelope` is filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeMode {
    /// Fixed world extent, independent of the geometry
    #[default]
    FixedDefault,
    /// Bounds of every point in the solid and its room
    Computed,
}

/// Document-level options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityGmlOptions {
    /// EPSG code written as `srsName="EPSG:<code>"`
    pub epsg: u32,
    /// Local name of the building element (`bldg:<name>`)
    pub building_type: String,
    pub envelope: EnvelopeMode,
}

impl Default for CityGmlOptions {
    fn default() -> Self {
        Self {
            epsg: 4326,
            building_type: "Building".to_string(),
            envelope: EnvelopeMode::FixedDefault,
        }
    }
}

/// Serialize one building into a complete CityGML document
pub fn write_city_model(building: &BuildingSolid, options: &CityGmlOptions) -> Result<String> {
    if !is_valid_element_name(&options.building_type) {
        return Err(Error::InvalidElementName(options.building_type.clone()));
    }

    let mut xml = XmlWriter::new();
    xml.declaration()?;
    xml.open("CityModel", NAMESPACES)?;

    let (lower, upper) = envelope_corners(building, options.envelope);
    let srs_name = format!("EPSG:{}", options.epsg);
    xml.open("gml:boundedBy", &[])?;
    xml.open("gml:Envelope", &[("srsName", srs_name.as_str())])?;
    xml.leaf("gml:lowerCorner", &[], &lower)?;
    xml.leaf("gml:upperCorner", &[], &upper)?;
    xml.close("gml:Envelope")?;
    xml.close("gml:boundedBy")?;

    let building_element = format!("bldg:{}", options.building_type);
    xml.open("cityObjectMember", &[])?;
    xml.open(&building_element, &[("gml:id", building.id.as_str())])?;
    write_attributes(&mut xml, &building.attributes)?;

    let solid_element = format!("bldg:{}", building.lod.solid_element());
    xml.open(&solid_element, &[])?;
    write_solid(&mut xml, &building.solid)?;
    xml.close(&solid_element)?;

    if let Some(room) = &building.room {
        let room_solid = format!("bldg:{}", LodLevel::Lod4.solid_element());
        xml.open("bldg:interiorRoom", &[])?;
        xml.open("bldg:Room", &[("gml:id", room.id.as_str())])?;
        xml.open(&room_solid, &[])?;
        write_solid(&mut xml, &room.solid)?;
        xml.close(&room_solid)?;
        xml.close("bldg:Room")?;
        xml.close("bldg:interiorRoom")?;
    }

    xml.close(&building_element)?;
    xml.close("cityObjectMember")?;
    xml.close("CityModel")?;

    tracing::debug!(
        building = %building.id,
        lod = building.lod.number(),
        bytes = xml.out.len(),
        "Wrote CityGML document"
    );

    Ok(xml.finish())
}

fn write_attributes(xml: &mut XmlWriter, attrs: &BuildingAttributes) -> Result<()> {
    if let Some(class) = &attrs.class {
        xml.leaf("bldg:class", &[], class)?;
    }
    if let Some(function) = &attrs.function {
        xml.leaf("bldg:function", &[], function)?;
    }
    if let Some(usage) = &attrs.usage {
        xml.leaf("bldg:usage", &[], usage)?;
    }
    if let Some(year) = attrs.year_of_construction {
        xml.leaf("bldg:yearOfConstruction", &[], &year.to_string())?;
    }
    if let Some(storeys) = attrs.storeys_above_ground {
        xml.leaf("bldg:storeysAboveGround", &[], &storeys.to_string())?;
    }
    if let Some(storeys) = attrs.storeys_below_ground {
        xml.leaf("bldg:storeysBelowGround", &[], &storeys.to_string())?;
    }
    if let Some(height) = attrs.measured_height {
        xml.leaf("bldg:measuredHeight", &[("uom", "m")], &height.to_string())?;
    }
    if let Some(address) = &attrs.address {
        write_address(xml, address)?;
    }
    Ok(())
}

fn write_address(xml: &mut XmlWriter, address: &Address) -> Result<()> {
    let has_locality = address.city.is_some()
        || address.street.is_some()
        || address.number.is_some()
        || address.postal_code.is_some();
    if address.country.is_none() && !has_locality {
        return Ok(());
    }

    xml.open("bldg:address", &[])?;
    xml.open("core:Address", &[])?;
    xml.open("core:xalAddress", &[])?;
    xml.open("xAL:AddressDetails", &[])?;

    // Locality nests in Country when there is one, else sits directly in AddressDetails
    if let Some(country) = &address.country {
        xml.open("xAL:Country", &[])?;
        xml.leaf("xAL:CountryName", &[], country)?;
    }
    if has_locality {
        write_locality(xml, address)?;
    }
    if address.country.is_some() {
        xml.close("xAL:Country")?;
    }

    xml.close("xAL:AddressDetails")?;
    xml.close("core:xalAddress")?;
    xml.close("core:Address")?;
    xml.close("bldg:address")
}

fn write_locality(xml: &mut XmlWriter, address: &Address) -> Result<()> {
    xml.open("xAL:Locality", &[("Type", "Town")])?;
    if let Some(city) = &address.city {
        xml.leaf("xAL:LocalityName", &[], city)?;
    }
    if address.street.is_some() || address.number.is_some() {
        xml.open("xAL:Thoroughfare", &[("Type", "Street")])?;
        if let Some(number) = &address.number {
            xml.leaf("xAL:ThoroughfareNumber", &[], number)?;
        }
        if let Some(street) = &address.street {
            xml.leaf("xAL:ThoroughfareName", &[], street)?;
        }
        xml.close("xAL:Thoroughfare")?;
    }
    if let Some(postal_code) = &address.postal_code {
        xml.open("xAL:PostalCode", &[])?;
        xml.leaf("xAL:PostalCodeNumber", &[], postal_code)?;
        xml.close("xAL:PostalCode")?;
    }
    xml.close("xAL:Locality")
}

fn write_solid(xml: &mut XmlWriter, solid: &Solid) -> Result<()> {
    xml.open("gml:Solid", &[("gml:id", solid.id.as_str())])?;
    xml.open("gml:exterior", &[])?;
    xml.open("gml:CompositeSurface", &[])?;
    for face in &solid.faces {
        xml.open("gml:surfaceMember", &[])?;
        xml.open("gml:Polygon", &[("gml:id", face.id.as_str())])?;
        xml.open("gml:exterior", &[])?;
        xml.open("gml:LinearRing", &[])?;
        xml.leaf("gml:posList", &[], &pos_list(&face.ring))?;
        xml.close("gml:LinearRing")?;
        xml.close("gml:exterior")?;
        xml.close("gml:Polygon")?;
        xml.close("gml:surfaceMember")?;
    }
    xml.close("gml:CompositeSurface")?;
    xml.close("gml:exterior")?;
    xml.close("gml:Solid")
}

/// `x y z x y z ...` for a ring
pub fn pos_list(ring: &[Point3D]) -> String {
    ring.iter()
        .map(|p| format!("{} {} {}", p.x, p.y, p.z))
        .collect::<Vec<_>>()
        .join(" ")
}

fn envelope_corners(building: &BuildingSolid, mode: EnvelopeMode) -> (String, String) {
    let fixed = || {
        (
            DEFAULT_LOWER_CORNER.to_string(),
            DEFAULT_UPPER_CORNER.to_string(),
        )
    };

    match mode {
        EnvelopeMode::FixedDefault => fixed(),
        EnvelopeMode::Computed => {
            let mut points = building.points();
            let Some(first) = points.next().map(Point3D::to_nalgebra) else {
                return fixed();
            };
            let (min, max) = points.fold((first, first), |(lo, hi), p| {
                let p = p.to_nalgebra();
                (lo.inf(&p), hi.sup(&p))
            });
            (
                pos_list(&[Point3D::new(min.x, min.y, min.z)]),
                pos_list(&[Point3D::new(max.x, max.y, max.z)]),
            )
        }
    }
}

/// XML name check for caller-supplied element names (ASCII subset of NCName)
fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Minimal indented XML emitter
struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn declaration(&mut self) -> Result<()> {
        writeln!(self.out, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        Ok(())
    }

    fn start_tag(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        write!(self.out, "{:indent$}<{}", "", name, indent = self.depth * 2)?;
        for (key, value) in attrs {
            write!(self.out, " {}=\"{}\"", key, escape(value))?;
        }
        write!(self.out, ">")?;
        Ok(())
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.start_tag(name, attrs)?;
        writeln!(self.out)?;
        self.depth += 1;
        Ok(())
    }

    fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start_tag(name, attrs)?;
        writeln!(self.out, "{}</{}>", escape(text), name)?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        writeln!(self.out, "{:indent$}</{}>", "", name, indent = self.depth * 2)?;
        Ok(())
    }

    fn finish(self) -> String {
        self.out
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
