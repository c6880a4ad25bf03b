//! # Market Micro-Area Adjacency
//!
//! The sales ledger labels each sale with a market micro-area
//! ("EAST VILLAGE", "PARK SLOPE", ...). Comparable discovery widens a
//! subject's search to adjacent areas, and the similarity scorer awards
//! partial credit for an adjacent-area match, so adjacency needs one
//! authoritative definition. This table is that definition: undirected
//! pairs, queried symmetrically.
//!
//! The table covers the core residential markets. A label with no entry
//! simply has no adjacents; search narrows to the subject's own area
//! and the adjacency score component contributes nothing.

/// Undirected adjacency pairs between market micro-area labels.
/// Labels are uppercase, matching the sales ledger's spelling.
const ADJACENT_PAIRS: &[(&str, &str)] = &[
    // Manhattan
    ("EAST VILLAGE", "LOWER EAST SIDE"),
    ("EAST VILLAGE", "GREENWICH VILLAGE"),
    ("EAST VILLAGE", "GRAMERCY"),
    ("EAST VILLAGE", "ALPHABET CITY"),
    ("LOWER EAST SIDE", "ALPHABET CITY"),
    ("LOWER EAST SIDE", "CHINATOWN"),
    ("GREENWICH VILLAGE", "WEST VILLAGE"),
    ("GREENWICH VILLAGE", "SOHO"),
    ("GREENWICH VILLAGE", "GRAMERCY"),
    ("WEST VILLAGE", "CHELSEA"),
    ("SOHO", "TRIBECA"),
    ("SOHO", "CHINATOWN"),
    ("TRIBECA", "FINANCIAL"),
    ("CHELSEA", "FLATIRON"),
    ("CHELSEA", "MIDTOWN WEST"),
    ("FLATIRON", "GRAMERCY"),
    ("GRAMERCY", "KIPS BAY"),
    ("KIPS BAY", "MURRAY HILL"),
    ("MURRAY HILL", "MIDTOWN EAST"),
    ("MIDTOWN EAST", "UPPER EAST SIDE (59-79)"),
    ("MIDTOWN WEST", "CLINTON"),
    ("CLINTON", "UPPER WEST SIDE (59-79)"),
    ("UPPER EAST SIDE (59-79)", "UPPER EAST SIDE (79-96)"),
    ("UPPER EAST SIDE (79-96)", "UPPER EAST SIDE (96-110)"),
    ("UPPER EAST SIDE (96-110)", "HARLEM-EAST"),
    ("UPPER WEST SIDE (59-79)", "UPPER WEST SIDE (79-96)"),
    ("UPPER WEST SIDE (79-96)", "UPPER WEST SIDE (96-116)"),
    ("UPPER WEST SIDE (96-116)", "MORNINGSIDE HEIGHTS"),
    ("MORNINGSIDE HEIGHTS", "HARLEM-CENTRAL"),
    ("HARLEM-CENTRAL", "HARLEM-EAST"),
    ("HARLEM-CENTRAL", "HARLEM-WEST"),
    ("HARLEM-CENTRAL", "HARLEM-UPPER"),
    ("HARLEM-UPPER", "WASHINGTON HEIGHTS LOWER"),
    ("WASHINGTON HEIGHTS LOWER", "WASHINGTON HEIGHTS UPPER"),
    ("WASHINGTON HEIGHTS UPPER", "INWOOD"),
    // Brooklyn
    ("PARK SLOPE", "PARK SLOPE SOUTH"),
    ("PARK SLOPE", "PROSPECT HEIGHTS"),
    ("PARK SLOPE", "GOWANUS"),
    ("PARK SLOPE SOUTH", "WINDSOR TERRACE"),
    ("PROSPECT HEIGHTS", "CROWN HEIGHTS"),
    ("PROSPECT HEIGHTS", "FORT GREENE"),
    ("FORT GREENE", "CLINTON HILL"),
    ("CLINTON HILL", "BEDFORD STUYVESANT"),
    ("BEDFORD STUYVESANT", "CROWN HEIGHTS"),
    ("BEDFORD STUYVESANT", "BUSHWICK"),
    ("BUSHWICK", "WILLIAMSBURG-EAST"),
    ("WILLIAMSBURG-EAST", "WILLIAMSBURG-NORTH"),
    ("WILLIAMSBURG-NORTH", "GREENPOINT"),
    ("WILLIAMSBURG-NORTH", "WILLIAMSBURG-SOUTH"),
    ("BOERUM HILL", "COBBLE HILL"),
    ("BOERUM HILL", "GOWANUS"),
    ("COBBLE HILL", "CARROLL GARDENS"),
    ("CARROLL GARDENS", "RED HOOK"),
    ("BROOKLYN HEIGHTS", "COBBLE HILL"),
    ("BROOKLYN HEIGHTS", "DOWNTOWN-FULTON FERRY"),
    // Queens
    ("ASTORIA", "LONG ISLAND CITY"),
    ("ASTORIA", "SUNNYSIDE"),
    ("LONG ISLAND CITY", "SUNNYSIDE"),
    ("SUNNYSIDE", "WOODSIDE"),
    ("WOODSIDE", "JACKSON HEIGHTS"),
    ("JACKSON HEIGHTS", "ELMHURST"),
    ("ELMHURST", "CORONA"),
    ("FOREST HILLS", "REGO PARK"),
    ("FLUSHING-NORTH", "FLUSHING-SOUTH"),
];

/// All areas adjacent to `label`, per the static table. Matching is
/// case-insensitive; the returned labels use the ledger's spelling.
pub fn adjacent_areas(label: &str) -> Vec<&'static str> {
    let needle = label.trim().to_ascii_uppercase();
    let mut out = Vec::new();
    for &(a, b) in ADJACENT_PAIRS {
        if a == needle {
            out.push(b);
        } else if b == needle {
            out.push(a);
        }
    }
    out
}

/// Whether two area labels are adjacent (symmetric, case-insensitive).
/// Equal labels are not considered adjacent; that is a same-area match.
pub fn are_adjacent(a: &str, b: &str) -> bool {
    let bn = b.trim().to_ascii_uppercase();
    adjacent_areas(a).iter().any(|&x| x == bn)
}

/// The compatible-area set for a candidate search: the subject's own
/// label, plus its adjacents unless adjacency is disabled.
pub fn compatible_areas(subject: &str, include_adjacent: bool) -> Vec<String> {
    let own = subject.trim().to_ascii_uppercase();
    let mut out = vec![own.clone()];
    if include_adjacent {
        out.extend(adjacent_areas(&own).iter().map(|s| s.to_string()));
    }
    out
}
