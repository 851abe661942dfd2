use crate::listings::{ListingId, Property};

/// One pending photo request, built from a listing when orchestration starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    listing_id: ListingId,
    prompt: String,
}

impl ListingRequest {
    pub fn new(listing_id: ListingId, prompt: impl Into<String>) -> Self {
        Self {
            listing_id,
            prompt: prompt.into(),
        }
    }

    pub fn from_property(property: &Property) -> Self {
        let prompt = format!(
            "a {}, which is a {} featuring {}.",
            property.name,
            property.property_type,
            property.tags.join(", ")
        );
        Self::new(property.id, prompt)
    }

    pub fn listing_id(&self) -> ListingId {
        self.listing_id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Wrap a listing fragment in the house photography brief.
pub fn photo_brief(fragment: &str) -> String {
    format!(
        "Professional real estate photograph of the interior of {fragment} \
         Ultra-realistic, 8k resolution, with abundant natural light. The style is bright and airy, \
         emphasizing clean lines, luxurious materials, and modern, minimalist decor. Captured with a \
         wide-angle lens to create a sense of spaciousness. No people or clutter."
    )
}
