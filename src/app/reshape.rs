//! Turning a photos payload into a state update.

use crate::api::RawPhoto;
use crate::error::FetchError;
use crate::state::{Photo, RoverInfo, StateUpdate};

/// Build the state update for a fetched photo list
///
/// Rover info comes from the first photo's nested rover object only; every
/// photo maps to a gallery entry in the same order.
pub fn reshape(raw: Vec<RawPhoto>) -> Result<StateUpdate, FetchError> {
    let first = raw.first().ok_or_else(|| FetchError::Malformed {
        reason: "photo list is empty, no rover info to show".to_string(),
    })?;

    let info = RoverInfo {
        launch_date: first.rover.launch_date.clone(),
        landing_date: first.rover.landing_date.clone(),
        status: first.rover.status.clone(),
    };

    let photos = raw
        .into_iter()
        .map(|item| Photo {
            src: item.img_src,
            camera: item.camera,
            date: item.earth_date,
        })
        .collect();

    Ok(StateUpdate::new().rover(info).photos(photos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{merge, ApplicationState, RoverName};
    use crate::test_support::raw_photos;

    #[test]
    fn test_rover_info_comes_from_first_entry() {
        let mut raw = raw_photos(RoverName::Curiosity, 3);
        raw[1].rover.status = "lost".into();
        raw[2].rover.launch_date = "1999-01-01".into();

        let state = merge(&ApplicationState::new(), reshape(raw).unwrap());

        assert_eq!(state.rover().launch_date, "2011-11-26");
        assert_eq!(state.rover().landing_date, "2012-08-06");
        assert_eq!(state.rover().status, "active");
    }

    #[test]
    fn test_photos_map_fields_in_order() {
        let raw = raw_photos(RoverName::Spirit, 4);
        let expected_sources: Vec<_> = raw.iter().map(|p| p.img_src.clone()).collect();

        let state = merge(&ApplicationState::new(), reshape(raw).unwrap());

        let sources: Vec<_> = state.photos().iter().map(|p| p.src.clone()).collect();
        assert_eq!(sources, expected_sources);
        assert_eq!(state.photos()[0].camera.name, "FHAZ");
        assert_eq!(state.photos()[0].date.to_string(), "2012-09-05");
    }

    #[test]
    fn test_reshape_does_not_set_selection() {
        let update = reshape(raw_photos(RoverName::Spirit, 1)).unwrap();
        let state = merge(&ApplicationState::new(), update);
        assert_eq!(state.selected_rover(), None);
    }

    #[test]
    fn test_empty_list_is_malformed() {
        assert!(matches!(reshape(Vec::new()), Err(FetchError::Malformed { .. })));
    }
}
