use crate::utils::money::Fcfa;

/// Upper distance bound (exclusive, km) and the price charged below it
pub const DISTANCE_TIERS: [(f64, Fcfa); 6] = [
    (5.0, 500),
    (10.0, 1000),
    (20.0, 1500),
    (50.0, 2500),
    (100.0, 3500),
    (200.0, 5000),
];

/// Price for anything at or beyond the last tier
pub const LONG_HAUL_PRICE: Fcfa = 7000;

/// Delivery cost for a distance in km. Negative and NaN distances count as 0.
pub fn tiered_delivery_cost(distance_km: f64) -> Fcfa {
    let distance = distance_km.max(0.0);

    DISTANCE_TIERS
        .iter()
        .find(|(limit, _)| distance < *limit)
        .map(|(_, price)| *price)
        .unwrap_or(LONG_HAUL_PRICE)
}
