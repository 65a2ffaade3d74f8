use tracing::{info, warn};

use crate::models::campaign::{UtmParam, UtmParams};
use crate::models::event::TrackedEvent;
use crate::repositories::campaign_repository::CampaignRepository;
use crate::tracking::tracker::Tracker;

/// Captures campaign attribution from the landing URL's query string.
/// Returns the captured set, or `None` when no recognized parameter is
/// present (in which case nothing is stored or tracked).
pub fn capture_campaign(
    query: &str,
    campaigns: &CampaignRepository,
    tracker: &dyn Tracker,
) -> Option<UtmParams> {
    let params = UtmParams::from_query(query);
    if params.is_empty() {
        return None;
    }
    info!(?params, "UTM parameters captured");

    if let Err(e) = campaigns.save(&params) {
        warn!("Failed to persist UTM parameters: {}", e);
    }

    let campaign = params.get(UtmParam::Campaign).unwrap_or("unknown");
    tracker.track(&TrackedEvent::campaign_visit(campaign));
    Some(params)
}
