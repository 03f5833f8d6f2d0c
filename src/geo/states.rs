//! Simplified state outlines used by the point-in-polygon lookup.
//!
//! Vertices are `(lon, lat)` pairs tracing a coarse outline of each state.
//! States with disjoint land masses appear more than once (e.g. Michigan's
//! two peninsulas). The table is scanned in order and the first containing
//! outline wins, so small states precede the large neighbors whose coarse
//! outlines may overhang them.

pub(super) const STATE_OUTLINES: &[(&str, &[(f64, f64)])] = &[
    // Small eastern states first.
    ("DC", &[(-77.12, 38.79), (-76.90, 38.79), (-76.90, 39.00), (-77.12, 39.00)]),
    ("RI", &[(-71.90, 41.10), (-71.10, 41.10), (-71.10, 42.02), (-71.90, 42.02)]),
    ("DE", &[(-75.80, 38.45), (-75.00, 38.45), (-75.00, 39.85), (-75.80, 39.85)]),
    ("CT", &[(-73.73, 40.98), (-71.79, 40.98), (-71.79, 42.05), (-73.73, 42.05)]),
    ("NJ", &[(-75.58, 38.92), (-73.88, 38.92), (-73.88, 41.36), (-75.58, 41.36)]),
    (
        "MA",
        &[
            (-73.51, 42.05),
            (-71.80, 42.02),
            (-70.80, 41.50),
            (-69.90, 41.60),
            (-69.90, 42.10),
            (-70.50, 42.70),
            (-71.00, 42.88),
            (-73.26, 42.75),
            (-73.51, 42.75),
        ],
    ),
    ("VT", &[(-73.44, 42.73), (-71.50, 42.73), (-71.50, 45.02), (-73.44, 45.02)]),
    ("NH", &[(-72.56, 42.70), (-70.70, 42.70), (-70.70, 45.31), (-72.56, 45.31)]),
    ("MD", &[(-79.49, 37.95), (-75.05, 37.95), (-75.05, 39.73), (-79.49, 39.73)]),
    (
        "WV",
        &[
            (-82.64, 38.40),
            (-82.60, 37.20),
            (-80.30, 37.30),
            (-77.72, 39.32),
            (-79.48, 39.72),
            (-80.52, 40.64),
            (-80.52, 39.72),
            (-81.50, 39.35),
        ],
    ),
    // Northeast and mid-Atlantic.
    ("ME", &[(-71.08, 43.05), (-66.95, 44.80), (-67.80, 47.07), (-70.99, 46.40), (-71.08, 45.30)]),
    (
        "NY",
        &[
            (-79.76, 42.00),
            (-75.35, 42.00),
            (-74.69, 41.36),
            (-73.92, 40.95),
            (-71.86, 41.05),
            (-73.93, 40.50),
            (-73.90, 41.15),
            (-73.35, 42.05),
            (-73.35, 45.01),
            (-76.80, 43.63),
            (-79.06, 43.27),
            (-79.76, 42.90),
        ],
    ),
    ("PA", &[(-80.52, 39.72), (-74.70, 39.72), (-74.70, 42.00), (-80.52, 42.00)]),
    (
        "VA",
        &[
            (-83.68, 36.59),
            (-75.24, 36.55),
            (-75.94, 38.03),
            (-77.30, 38.90),
            (-78.35, 39.46),
            (-79.49, 38.50),
            (-81.97, 37.54),
        ],
    ),
    ("NC", &[(-84.32, 35.00), (-75.46, 35.00), (-75.46, 36.59), (-84.32, 36.59)]),
    (
        "SC",
        &[(-83.35, 34.99), (-80.90, 35.20), (-78.54, 33.86), (-80.85, 32.03), (-81.50, 33.00)],
    ),
    ("GA", &[(-85.61, 30.72), (-80.84, 30.72), (-80.84, 35.00), (-85.61, 35.00)]),
    (
        "FL",
        &[
            (-87.63, 30.20),
            (-87.63, 31.00),
            (-85.00, 31.00),
            (-82.20, 30.56),
            (-80.00, 30.73),
            (-80.03, 25.10),
            (-81.80, 24.50),
            (-83.00, 29.10),
        ],
    ),
    // South.
    ("AL", &[(-88.47, 30.22), (-84.89, 30.22), (-84.89, 35.01), (-88.47, 35.01)]),
    ("MS", &[(-91.65, 30.18), (-88.10, 30.18), (-88.10, 35.00), (-91.65, 35.00)]),
    ("TN", &[(-90.31, 35.00), (-81.65, 35.00), (-81.65, 36.60), (-90.31, 36.60)]),
    ("KY", &[(-89.42, 36.50), (-82.00, 36.60), (-82.00, 38.80), (-84.80, 39.10), (-89.42, 37.10)]),
    ("LA", &[(-94.04, 28.93), (-88.90, 28.93), (-88.90, 33.02), (-94.04, 33.02)]),
    ("AR", &[(-94.62, 33.00), (-89.64, 33.00), (-89.64, 36.50), (-94.62, 36.50)]),
    // Texas and Oklahoma panhandles interlock; Texas carries its own.
    (
        "TX",
        &[
            (-106.65, 31.90),
            (-103.06, 31.90),
            (-103.06, 36.50),
            (-100.00, 36.50),
            (-100.00, 34.56),
            (-94.43, 33.55),
            (-93.51, 31.00),
            (-93.84, 29.70),
            (-97.15, 25.95),
            (-99.10, 26.40),
            (-101.40, 29.75),
            (-104.90, 30.60),
        ],
    ),
    ("OK", &[(-100.00, 33.62), (-94.43, 33.62), (-94.43, 37.00), (-100.00, 37.00)]),
    ("OK", &[(-103.00, 36.50), (-100.00, 36.50), (-100.00, 37.00), (-103.00, 37.00)]),
    ("NM", &[(-109.05, 31.33), (-103.00, 31.33), (-103.00, 37.00), (-109.05, 37.00)]),
    ("AZ", &[(-114.82, 31.33), (-109.05, 31.33), (-109.05, 37.00), (-114.82, 37.00)]),
    // Midwest.
    ("MO", &[(-95.77, 36.50), (-89.10, 36.50), (-89.10, 40.61), (-95.77, 40.61)]),
    ("IL", &[(-91.51, 37.00), (-87.50, 37.00), (-87.50, 42.51), (-91.51, 42.51)]),
    ("IN", &[(-88.10, 37.77), (-84.78, 37.77), (-84.78, 41.76), (-88.10, 41.76)]),
    ("OH", &[(-84.82, 38.40), (-80.52, 38.40), (-80.52, 41.98), (-84.82, 41.98)]),
    (
        "MI",
        &[(-86.50, 41.70), (-82.40, 41.70), (-82.50, 43.60), (-83.50, 46.10), (-86.50, 45.00)],
    ),
    (
        "MI",
        &[
            (-90.42, 46.40),
            (-88.40, 46.80),
            (-84.40, 46.45),
            (-84.60, 45.90),
            (-87.00, 45.30),
            (-89.00, 46.00),
        ],
    ),
    ("WI", &[(-92.89, 42.49), (-86.80, 42.49), (-86.80, 46.00), (-90.90, 46.90), (-92.89, 45.60)]),
    ("MN", &[(-97.24, 43.50), (-89.50, 43.50), (-89.50, 49.00), (-97.24, 49.00)]),
    ("IA", &[(-96.64, 40.58), (-90.14, 40.58), (-90.14, 43.50), (-96.64, 43.50)]),
    ("KS", &[(-102.05, 37.00), (-94.60, 37.00), (-94.60, 40.00), (-102.05, 40.00)]),
    ("NE", &[(-104.05, 40.00), (-95.31, 40.00), (-95.31, 43.00), (-104.05, 43.00)]),
    ("SD", &[(-104.05, 42.49), (-96.44, 42.49), (-96.44, 45.94), (-104.05, 45.94)]),
    ("ND", &[(-104.05, 45.94), (-96.55, 45.94), (-96.55, 49.00), (-104.05, 49.00)]),
    // Mountain west.
    ("CO", &[(-109.05, 37.00), (-102.05, 37.00), (-102.05, 41.00), (-109.05, 41.00)]),
    ("WY", &[(-111.05, 41.00), (-104.05, 41.00), (-104.05, 45.00), (-111.05, 45.00)]),
    ("UT", &[(-114.05, 37.00), (-109.05, 37.00), (-109.05, 42.00), (-114.05, 42.00)]),
    ("MT", &[(-116.05, 44.36), (-104.05, 45.00), (-104.05, 49.00), (-116.05, 49.00)]),
    (
        "ID",
        &[
            (-117.24, 42.00),
            (-111.05, 42.00),
            (-111.05, 44.50),
            (-113.00, 45.70),
            (-116.05, 45.00),
            (-116.05, 49.00),
            (-117.03, 49.00),
        ],
    ),
    (
        "NV",
        &[(-120.00, 42.00), (-114.05, 42.00), (-114.05, 36.00), (-114.60, 35.00), (-120.00, 39.00)],
    ),
    // Pacific.
    (
        "CA",
        &[
            (-124.40, 42.00),
            (-120.00, 42.00),
            (-120.00, 39.00),
            (-114.60, 35.00),
            (-114.52, 32.72),
            (-117.13, 32.53),
            (-120.70, 34.40),
            (-124.40, 40.00),
        ],
    ),
    ("OR", &[(-124.57, 42.00), (-116.46, 42.00), (-116.46, 46.00), (-123.50, 46.20), (-124.57, 46.20)]),
    ("WA", &[(-124.80, 45.54), (-116.92, 45.99), (-116.92, 49.00), (-124.80, 49.00)]),
    ("AK", &[(-169.00, 51.20), (-129.98, 54.00), (-129.98, 71.40), (-169.00, 71.40)]),
    ("HI", &[(-160.30, 18.90), (-154.80, 18.90), (-154.80, 22.25), (-160.30, 22.25)]),
];
