use chrono::NaiveDate;

use super::domain::{ListingId, ListingStatus, PricePoint, Property, Review};

struct Seed {
    id: u32,
    name: &'static str,
    price: u64,
    beds: u8,
    baths: u8,
    sqft: u32,
    property_type: &'static str,
    year_built: u16,
    price_per_sqft: u32,
    status: ListingStatus,
    tags: &'static [&'static str],
    price_history: &'static [(i32, u32, u32, u64)],
    reviews: &'static [(&'static str, f32, &'static str)],
}

const SEEDS: [Seed; 6] = [
    Seed {
        id: 1,
        name: "Urban Loft, Downtown",
        price: 450_000,
        beds: 2,
        baths: 2,
        sqft: 1200,
        property_type: "Loft",
        year_built: 2018,
        price_per_sqft: 375,
        status: ListingStatus::NewListing,
        tags: &["Exposed Brick", "Open Floor Plan", "Central Location"],
        price_history: &[(2019, 3, 15, 380_000)],
        reviews: &[
            ("Alex D.", 5.0, "Incredible space and location!"),
            ("Samantha B.", 4.0, "Great loft, but can be a bit noisy on weekends."),
        ],
    },
    Seed {
        id: 2,
        name: "Suburban Villa, Green Hills",
        price: 1_200_000,
        beds: 4,
        baths: 3,
        sqft: 3500,
        property_type: "Villa",
        year_built: 2022,
        price_per_sqft: 343,
        status: ListingStatus::ForSale,
        tags: &[
            "Swimming Pool",
            "Large Backyard",
            "Gated Community",
            "Private Garage",
        ],
        price_history: &[],
        reviews: &[
            ("Brenda K.", 5.0, "Our dream home. The pool is amazing."),
            (
                "Tom H.",
                4.0,
                "Fantastic property. The garden needs a bit of work, but otherwise perfect.",
            ),
        ],
    },
    Seed {
        id: 3,
        name: "Beachfront Condo",
        price: 890_000,
        beds: 3,
        baths: 2,
        sqft: 2100,
        property_type: "Condo",
        year_built: 2015,
        price_per_sqft: 424,
        status: ListingStatus::ForSale,
        tags: &["Ocean View", "Private Balcony", "Swimming Pool"],
        price_history: &[(2016, 1, 20, 750_000)],
        reviews: &[
            ("Carlos M.", 4.0, "Great views, though the HOA fees are a bit high."),
            (
                "Jessica L.",
                5.0,
                "Waking up to the ocean sound is priceless. Highly recommend.",
            ),
        ],
    },
    Seed {
        id: 4,
        name: "Modern Penthouse",
        price: 2_100_000,
        beds: 4,
        baths: 4,
        sqft: 4200,
        property_type: "Penthouse",
        year_built: 2024,
        price_per_sqft: 500,
        status: ListingStatus::NewListing,
        tags: &[
            "Rooftop Deck",
            "Floor-to-ceiling windows",
            "Ocean View",
            "Private Garage",
        ],
        price_history: &[],
        reviews: &[
            ("Michael P.", 5.0, "The epitome of luxury. The views are breathtaking."),
            (
                "Sarah J.",
                4.0,
                "Incredible apartment. The elevator can be slow during peak hours.",
            ),
        ],
    },
    Seed {
        id: 5,
        name: "City Apartment",
        price: 320_000,
        beds: 1,
        baths: 1,
        sqft: 850,
        property_type: "Apartment",
        year_built: 2010,
        price_per_sqft: 376,
        status: ListingStatus::ForSale,
        tags: &["Recently Renovated", "Central Location"],
        price_history: &[(2011, 5, 30, 210_000)],
        reviews: &[("Dana F.", 4.0, "Perfect for a single person working downtown.")],
    },
    Seed {
        id: 6,
        name: "Executive Townhouse",
        price: 975_000,
        beds: 3,
        baths: 3,
        sqft: 2800,
        property_type: "Townhouse",
        year_built: 2019,
        price_per_sqft: 348,
        status: ListingStatus::ForSale,
        tags: &[
            "Private Garage",
            "Modern Kitchen",
            "Gated Community",
            "Rooftop Deck",
        ],
        price_history: &[(2020, 2, 10, 850_000)],
        reviews: &[
            ("Frank G.", 5.0, "Spacious and very well built."),
            (
                "Emily R.",
                3.0,
                "Nice place, but the community rules are very strict.",
            ),
        ],
    },
];

impl Seed {
    fn to_property(&self) -> Property {
        Property {
            id: ListingId(self.id),
            name: self.name.to_string(),
            price: self.price,
            beds: self.beds,
            baths: self.baths,
            sqft: self.sqft,
            property_type: self.property_type.to_string(),
            year_built: self.year_built,
            price_per_sqft: self.price_per_sqft,
            status: self.status,
            tags: self.tags.iter().map(|tag| tag.to_string()).collect(),
            price_history: self
                .price_history
                .iter()
                .filter_map(|&(year, month, day, price)| {
                    NaiveDate::from_ymd_opt(year, month, day).map(|date| PricePoint { date, price })
                })
                .collect(),
            reviews: self
                .reviews
                .iter()
                .map(|&(author, rating, comment)| Review {
                    author: author.to_string(),
                    rating,
                    comment: comment.to_string(),
                })
                .collect(),
            image: None,
            image_loading: true,
        }
    }
}

/// The six showcase listings, photos unresolved.
pub fn standard_listings() -> Vec<Property> {
    SEEDS.iter().map(Seed::to_property).collect()
}

/// Listings carrying `tag`, or every listing when no tag is active.
pub fn filter_by_tag<'a>(listings: &'a [Property], tag: Option<&str>) -> Vec<&'a Property> {
    match tag {
        Some(tag) => listings.iter().filter(|listing| listing.has_tag(tag)).collect(),
        None => listings.iter().collect(),
    }
}

/// Distinct tags in first-seen order.
pub fn distinct_tags(listings: &[Property]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in listings.iter().flat_map(|listing| listing.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}
