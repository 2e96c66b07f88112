//! Built-in district table for Lipa City, Batangas.
//!
//! Coordinates are approximate barangay centroids, good enough to place a
//! heat map marker. Deployments with surveyed values load their own table
//! through `DISTRICT_TABLE_PATH`.

use std::collections::HashMap;

use super::district::{DistrictTable, DistrictTableError};
use crate::common::Coordinate;

/// City hall, used when a matched barangay has no coordinate of its own.
pub const LIPA_CITY_CENTER: Coordinate = Coordinate::new(13.9411, 121.1639);

const BARANGAYS: &[(&str, Option<(f64, f64)>)] = &[
    ("Adya", Some((13.8869, 121.1558))),
    ("Anilao", Some((13.9197, 121.1856))),
    ("Anilao-Labac", Some((13.9089, 121.1947))),
    ("Antipolo del Norte", Some((13.9367, 121.1811))),
    ("Antipolo del Sur", Some((13.9289, 121.1783))),
    ("Bagong Pook", Some((13.9522, 121.1456))),
    ("Balintawak", Some((13.9525, 121.1633))),
    ("Banaybanay", Some((13.9486, 121.1364))),
    ("Bolbok", Some((13.9292, 121.1547))),
    ("Bugtong na Pulo", Some((13.9631, 121.1292))),
    ("Bulacnin", Some((13.9733, 121.1694))),
    ("Bulaklakan", Some((13.9047, 121.2167))),
    ("Calamias", Some((13.8708, 121.2128))),
    ("Cumba", Some((13.8958, 121.2358))),
    ("Dagatan", Some((13.9619, 121.1758))),
    ("Duhatan", Some((13.8847, 121.2383))),
    ("Halang", Some((13.9106, 121.2189))),
    ("Inosloban", Some((13.9789, 121.1542))),
    ("Kayumanggi", Some((13.9575, 121.1806))),
    ("Latag", Some((13.8997, 121.1656))),
    ("Lodlod", Some((13.9064, 121.1536))),
    ("Lumbang", Some((13.8894, 121.1819))),
    ("Mabini", Some((13.9431, 121.1525))),
    ("Malagonlong", Some((13.8794, 121.2039))),
    ("Malitlit", Some((13.9036, 121.1394))),
    ("Marawoy", Some((13.95, 121.15))),
    ("Mataas na Lupa", Some((13.9356, 121.1683))),
    ("Munting Pulo", Some((13.9003, 121.2033))),
    ("Pagolingin Bata", Some((13.8767, 121.2294))),
    ("Pagolingin East", Some((13.8703, 121.2397))),
    ("Pagolingin West", Some((13.8725, 121.2236))),
    ("Pangao", Some((13.8914, 121.1297))),
    ("Pinagkawitan", Some((13.9183, 121.1994))),
    ("Pinagtongulan", Some((13.9247, 121.1331))),
    ("Plaridel", Some((13.9636, 121.1919))),
    ("Pusil", Some((13.9869, 121.1456))),
    ("Quezon", Some((13.8647, 121.1975))),
    ("Rizal", Some((13.8856, 121.2258))),
    ("Sabang", Some((13.9547, 121.1578))),
    ("Sampaguita", Some((13.9497, 121.1731))),
    ("San Benito", Some((13.8778, 121.2519))),
    ("San Carlos", Some((13.9267, 121.1725))),
    ("San Celestino", Some((13.8672, 121.1842))),
    ("San Francisco", Some((13.9264, 121.2181))),
    ("San Guillermo", Some((13.9586, 121.2033))),
    ("San Jose", Some((13.9147, 121.1683))),
    ("San Lucas", Some((13.9056, 121.1808))),
    ("San Salvador", Some((13.9119, 121.1325))),
    ("San Sebastian", Some((13.9747, 121.1892))),
    ("Santo Niño", Some((13.9292, 121.1936))),
    ("Santo Toribio", Some((13.9442, 121.1947))),
    ("Sapac", Some((13.8867, 121.2006))),
    ("Sico", Some((13.9422, 121.1408))),
    ("Talisay", Some((13.9694, 121.1589))),
    ("Tambo", Some((13.9592, 121.1503))),
    ("Tangob", Some((13.8961, 121.1453))),
    ("Tanguay", Some((13.9172, 121.2353))),
    ("Tibig", Some((13.9483, 121.1853))),
    ("Tipacan", Some((13.9231, 121.1503))),
    ("Barangay 1 (Poblacion)", Some((13.9414, 121.1628))),
    ("Barangay 2 (Poblacion)", Some((13.9406, 121.1619))),
    ("Barangay 3 (Poblacion)", Some((13.9397, 121.1633))),
    ("Barangay 4 (Poblacion)", Some((13.9422, 121.1644))),
    ("Barangay 5 (Poblacion)", Some((13.9428, 121.1622))),
    ("Barangay 6 (Poblacion)", Some((13.9394, 121.1650))),
    ("Barangay 7 (Poblacion)", Some((13.9381, 121.1622))),
    ("Barangay 8 (Poblacion)", Some((13.9436, 121.1658))),
    ("Barangay 9 (Poblacion)", Some((13.9447, 121.1636))),
    ("Barangay 9-A (Poblacion)", Some((13.9453, 121.1617))),
    ("Barangay 10 (Poblacion)", Some((13.9369, 121.1642))),
    ("Barangay 11 (Poblacion)", Some((13.9403, 121.1667))),
    ("Barangay 12 (Poblacion)", Some((13.9419, 121.1675))),
    ("Poblacion", None),
];

/// The built-in Lipa City table, checked like any loaded table.
pub fn lipa_city_districts() -> Result<DistrictTable, DistrictTableError> {
    let names = BARANGAYS.iter().map(|(name, _)| name.to_string()).collect();
    let coordinates: HashMap<String, Coordinate> = BARANGAYS
        .iter()
        .filter_map(|(name, coordinate)| {
            coordinate.map(|(lat, lng)| (name.to_string(), Coordinate::new(lat, lng)))
        })
        .collect();

    DistrictTable::new(names, coordinates, LIPA_CITY_CENTER)
}
