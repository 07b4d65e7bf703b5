//! The Birdability checklist: every field of the questionnaire, where it
//! lives in the answer tree and which Survey123 question it feeds.
//!
//! One table drives both the schema used by the codec and the external
//! transform, so a field is declared exactly once.

use std::sync::LazyLock;

use birdability_types::{FieldKind, FieldPath, Schema};

/// Top-level report fields.
pub const ID: &str = "id";
pub const CREATED_AT: &str = "createdAt";
pub const NAME: &str = "name";

/// Top-level keys written by older checklist versions and where their
/// answers live now.
pub static LEGACY_PATHS: &[(&str, &str)] = &[
    ("finalThoughts", "finalThoughts.comments"),
    ("overallRating", "finalThoughts.overallRating"),
    ("photoPermissions", "finalThoughts.photoPermissions"),
    ("photoAltText", "finalThoughts.photoAltText"),
    ("contactName", "contactInformation.name"),
    ("contactEmail", "contactInformation.email"),
    ("eventCode", "contactInformation.eventCode"),
];

/// Paths read by the compound Survey123 rules and the session helpers.
pub mod paths {
    pub const LOCATION_NAME: &str = "generalInformation.locationName";
    pub const TRAIL_NAME: &str = "generalInformation.trailName";
    pub const LATITUDE: &str = "generalInformation.latitude";
    pub const LONGITUDE: &str = "generalInformation.longitude";
    pub const UNITS_PREFERRED: &str = "generalInformation.unitsPreferred";
    pub const TRAIL_TYPE: &str = "generalInformation.trailType";
    pub const TRAIL_LOOP: &str = "generalInformation.trailLoop";
    pub const TRAIL_OUT_AND_BACK: &str = "generalInformation.trailOutAndBack";
    pub const TRAIL_LOLLIPOP: &str = "generalInformation.trailLollipop";
    pub const ENTRANCE_FEE: &str = "generalInformation.entranceFee";
    pub const ENTRANCE_FEE_DETAILS: &str = "generalInformation.entranceFeeDetails";
    pub const PARKING_FEE: &str = "generalInformation.parkingFee";
    pub const PARKING_FEE_DETAILS: &str = "generalInformation.parkingFeeDetails";
}

/// How a catalog field is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Flag,
    Text,
    TriState,
    Choice(&'static [&'static str]),
}

impl Answer {
    pub fn field_kind(self) -> FieldKind {
        match self {
            Self::Flag => FieldKind::Flag,
            Self::Text => FieldKind::Text,
            Self::TriState => FieldKind::TriState,
            Self::Choice(options) => FieldKind::choice(options.iter().copied()),
        }
    }
}

/// One field of a catalog group.
#[derive(Debug, Clone, Copy)]
pub struct CatalogField {
    pub name: &'static str,
    pub answer: Answer,
    /// Survey123 question key, e.g. `birding_location_accessibility_/parking_info/pull_off`.
    /// Fields without one are either local notes or feed a compound rule.
    pub external: Option<&'static str>,
}

/// A set of fields sharing a parent path, optionally behind a presence gate.
#[derive(Debug, Clone, Copy)]
pub struct CatalogGroup {
    /// Dotted parent path; empty for top-level fields.
    pub path: &'static str,
    /// Name of the tri-state field that decides whether the details count.
    pub gate: Option<&'static str>,
    pub fields: &'static [CatalogField],
}

impl CatalogGroup {
    pub fn field_path(&self, field: &CatalogField) -> FieldPath {
        FieldPath::new(self.path).child(field.name)
    }

    pub fn gate_field(&self) -> Option<&CatalogField> {
        let gate = self.gate?;
        self.fields.iter().find(|f| f.name == gate)
    }
}

const fn flag(name: &'static str, external: &'static str) -> CatalogField {
    CatalogField {
        name,
        answer: Answer::Flag,
        external: Some(external),
    }
}

const fn text(name: &'static str, external: &'static str) -> CatalogField {
    CatalogField {
        name,
        answer: Answer::Text,
        external: Some(external),
    }
}

const fn yes_no(name: &'static str, external: &'static str) -> CatalogField {
    CatalogField {
        name,
        answer: Answer::TriState,
        external: Some(external),
    }
}

const fn local(name: &'static str, answer: Answer) -> CatalogField {
    CatalogField {
        name,
        answer,
        external: None,
    }
}

const fn choice(
    name: &'static str,
    options: &'static [&'static str],
    external: Option<&'static str>,
) -> CatalogField {
    CatalogField {
        name,
        answer: Answer::Choice(options),
        external,
    }
}

pub const TRAIL_TYPES: &[&str] = &["loop", "out_and_back", "lollipop"];
pub const UNITS: &[&str] = &["mi", "km"];
pub const RATINGS: &[&str] = &["1", "2", "3", "4", "5"];

/// The whole questionnaire, in form order.
pub static CATALOG: &[CatalogGroup] = &[
    CatalogGroup {
        path: "",
        gate: None,
        fields: &[local(NAME, Answer::Text)],
    },
    CatalogGroup {
        path: "generalInformation",
        gate: None,
        fields: &[
            local("locationName", Answer::Text),
            local("trailName", Answer::Text),
            text("websiteUrl", "general_information/website"),
            local("latitude", Answer::Text),
            local("longitude", Answer::Text),
            text("lengthOfTrail", "general_information/length_of_trail"),
            choice("unitsPreferred", UNITS, None),
            choice("trailType", TRAIL_TYPES, None),
            local("trailLoop", Answer::Flag),
            local("trailOutAndBack", Answer::Flag),
            local("trailLollipop", Answer::Flag),
            local("entranceFee", Answer::Flag),
            local("entranceFeeDetails", Answer::Text),
            local("parkingFee", Answer::Flag),
            local("parkingFeeDetails", Answer::Text),
            yes_no("goodCarBirding", "general_information/car_birding"),
            text(
                "goodCarBirdingDetails",
                "general_information/car_birding_comments",
            ),
            yes_no(
                "publicTransitAccess",
                "general_information/public_transportation",
            ),
            text(
                "publicTransitInfo",
                "general_information/public_transportation_comments",
            ),
            yes_no("walkingBikingAccess", "general_information/walk_bike"),
            text(
                "walkingOrBikingInfo",
                "general_information/walking_biking_comments",
            ),
            local("notes", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.parking",
        gate: Some("hasParking"),
        fields: &[
            yes_no("hasParking", "birding_location_accessibility_/is_there_parking"),
            flag("pullOffAreas", "birding_location_accessibility_/parking_info/pull_off"),
            flag(
                "regularAccessible",
                "birding_location_accessibility_/parking_info/regular_accessible",
            ),
            flag(
                "vanAccessible",
                "birding_location_accessibility_/parking_info/van_accessible",
            ),
            flag("curbCuts", "birding_location_accessibility_/parking_info/curb_cuts"),
            flag("surfacePaved", "birding_location_accessibility_/parking_info/paved"),
            // "grael" is how the Survey123 form spells it.
            flag("surfaceGravel", "birding_location_accessibility_/parking_info/grael"),
            flag("manyPotholes", "birding_location_accessibility_/parking_info/potholes"),
            flag(
                "parkingOnSlope",
                "birding_location_accessibility_/parking_info/unmangeable_slope",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.bathrooms",
        gate: Some("hasBathrooms"),
        fields: &[
            yes_no(
                "hasBathrooms",
                "birding_location_accessibility_/are_there_bathrooms",
            ),
            flag(
                "regularPortableRestrooms",
                "birding_location_accessibility_/bathrooms_info/regular_portable",
            ),
            flag(
                "accessiblePortableRestrooms",
                "birding_location_accessibility_/bathrooms_info/accessible_portable",
            ),
            flag(
                "onlyAccessibleWhenVisitorsCenterOpen",
                "birding_location_accessibility_/bathrooms_info/only_visitors_center",
            ),
            flag(
                "doorFramesAtLeast32in",
                "birding_location_accessibility_/bathrooms_info/door_frames",
            ),
            flag(
                "stallSizeAtLeast60by60in",
                "birding_location_accessibility_/bathrooms_info/stall_size",
            ),
            flag(
                "toiletSeatHeight17to19in",
                "birding_location_accessibility_/bathrooms_info/toilet",
            ),
            flag(
                "sinkAt34inOrLower",
                "birding_location_accessibility_/bathrooms_info/sink",
            ),
            flag(
                "mirrorBottomAt40inOrLower",
                "birding_location_accessibility_/bathrooms_info/mirror",
            ),
            flag(
                "handDryersAt48inOrLower",
                "birding_location_accessibility_/bathrooms_info/hand_dryers",
            ),
            flag(
                "thresholdNotOnSlant",
                "birding_location_accessibility_/bathrooms_info/threshold",
            ),
            flag(
                "allGenderBathrooms",
                "birding_location_accessibility_/bathrooms_info/all_gender",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.ramps",
        gate: Some("hasRamps"),
        fields: &[
            yes_no("hasRamps", "birding_location_accessibility_/are_there_ramps"),
            flag(
                "perfectRamp",
                "birding_location_accessibility_/ramps_info/perfect_ramp",
            ),
            flag(
                "steeperRamp",
                "birding_location_accessibility_/ramps_info/steeper_ramp",
            ),
            flag(
                "verySteepRamp",
                "birding_location_accessibility_/ramps_info/very_steep_ramp",
            ),
            flag("wideRamps", "birding_location_accessibility_/ramps_info/wide_ramps"),
            flag(
                "flatLandings",
                "birding_location_accessibility_/ramps_info/flat_landings",
            ),
            flag("handrails", "birding_location_accessibility_/ramps_info/handrails"),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.steps",
        gate: Some("present"),
        fields: &[
            yes_no("present", "birding_location_accessibility_/steps"),
            text("comments", "birding_location_accessibility_/steps_comments"),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.benches",
        gate: Some("hasBenches"),
        fields: &[
            yes_no("hasBenches", "birding_location_accessibility_/are_there_benches"),
            flag(
                "benchesEvery200m",
                "birding_location_accessibility_/benches_info/benches_1_8",
            ),
            flag(
                "benchesLessFrequent",
                "birding_location_accessibility_/benches_info/benches_less_frequent",
            ),
            flag(
                "benchesWithArmrests",
                "birding_location_accessibility_/benches_info/armrest",
            ),
            flag(
                "benchesConnectedByPavedSurface",
                "birding_location_accessibility_/benches_info/bench_trail",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.gates",
        gate: Some("hasGates"),
        fields: &[
            yes_no("hasGates", "birding_location_accessibility_/are_there_gates"),
            flag(
                "spaceAtLeast36in",
                "birding_location_accessibility_/gates_info/space_between_bollards",
            ),
            flag(
                "gatesAtLeast36in",
                "birding_location_accessibility_/gates_info/wide_gates",
            ),
            flag(
                "gatesNarrowerThan36in",
                "birding_location_accessibility_/gates_info/narrower_gates",
            ),
            flag(
                "swingKissingGate",
                "birding_location_accessibility_/gates_info/swing_gates",
            ),
            flag(
                "roadClosureGateNoAlternative",
                "birding_location_accessibility_/gates_info/road_closure_gates_no_path",
            ),
            flag(
                "roadClosureGateWithPathAtLeast36in",
                "birding_location_accessibility_/gates_info/road_closure_gates",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.railings",
        gate: Some("hasRailings"),
        fields: &[
            yes_no("hasRailings", "birding_location_accessibility_/are_there_railings"),
            flag(
                "smallLipOnEdge",
                "birding_location_accessibility_/railings_info/small_lip",
            ),
            flag(
                "topRailingsOptimizeSight",
                "birding_location_accessibility_/railings_info/accessible_top_railing",
            ),
            flag(
                "topRailingThickAndObstructive",
                "birding_location_accessibility_/railings_info/inaccessible_top_railing",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.birdBlinds",
        gate: Some("hasBirdBlinds"),
        fields: &[
            yes_no(
                "hasBirdBlinds",
                "birding_location_accessibility_/are_there_bird_blinds",
            ),
            flag(
                "noDoorOrEntryway",
                "birding_location_accessibility_/bird_blinds_info/no_doorway",
            ),
            flag(
                "doorwayAtTopOfRampOrOnCrossSlope",
                "birding_location_accessibility_/bird_blinds_info/doorway_at_top",
            ),
            flag(
                "doorCanBeOpenedAndHeldWithOneHand",
                "birding_location_accessibility_/bird_blinds_info/door_can_open",
            ),
            flag(
                "noLipAtThreshold",
                "birding_location_accessibility_/bird_blinds_info/no_lip",
            ),
            flag(
                "doorwayAtLeast32in",
                "birding_location_accessibility_/bird_blinds_info/wide_door",
            ),
            flag(
                "enoughSpaceInsideForWheelchairs",
                "birding_location_accessibility_/bird_blinds_info/enough_space",
            ),
            flag(
                "viewingWindowsBottom30to40in",
                "birding_location_accessibility_/bird_blinds_info/viewing_windows",
            ),
            flag(
                "shelvesNoDeeperThan6in",
                "birding_location_accessibility_/bird_blinds_info/shallow_shelves",
            ),
            flag(
                "interiorBenchesMovable",
                "birding_location_accessibility_/bird_blinds_info/interior_benches",
            ),
            flag(
                "roofProvidesShade",
                "birding_location_accessibility_/bird_blinds_info/roof",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.services",
        gate: None,
        fields: &[
            flag("visitorCenter", "birding_location_accessibility_/visitors_center"),
            flag("staffOrVolunteers", "birding_location_accessibility_/staff"),
            flag(
                "interpretivePrograms",
                "birding_location_accessibility_/interpretive_programs",
            ),
            flag("accessibleTram", "birding_location_accessibility_/tram"),
            flag(
                "gatedAccessibleIfArranged",
                "birding_location_accessibility_/gated_areas",
            ),
            flag("mealsAvailable", "birding_location_accessibility_/meals"),
            flag(
                "waterFountainsOutside",
                "birding_location_accessibility_/water_fountains",
            ),
            flag(
                "accessibleWaterFountains",
                "birding_location_accessibility_/accessible_water_fountains",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.trailSurfaces",
        gate: None,
        fields: &[
            flag("asphalt", "birding_location_accessibility_/asphalt"),
            flag("concrete", "birding_location_accessibility_/concrete"),
            flag("woodenBoardwalk", "birding_location_accessibility_/boardwalk"),
            flag(
                "wellPackedCrushedStone",
                "birding_location_accessibility_/packed_stone",
            ),
            flag(
                "looseCrushedStoneOrGravel",
                "birding_location_accessibility_/loose_stone",
            ),
            flag("hardPackedSoil", "birding_location_accessibility_/hard_soil"),
            flag("looseDirt", "birding_location_accessibility_/loose_dirt"),
            flag("sand", "birding_location_accessibility_/sand"),
            flag("mulch", "birding_location_accessibility_/mulch"),
            flag("thickGrass", "birding_location_accessibility_/grass"),
            flag("muddySections", "birding_location_accessibility_/muddy"),
            flag("rutsAndPotholes", "birding_location_accessibility_/ruts"),
            flag(
                "protrudingRootsAndRocks",
                "birding_location_accessibility_/roots_rocks",
            ),
            text(
                "comments",
                "birding_location_accessibility_/trail_surface_comments",
            ),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.trailSlopes",
        gate: None,
        fields: &[
            flag("completelyFlat", "birding_location_accessibility_/flat"),
            flag(
                "noSteeperThan1to20",
                "birding_location_accessibility_/steep_trail",
            ),
            flag(
                "steeperThan1to20",
                "birding_location_accessibility_/steeper_trail",
            ),
            flag("verySteep", "birding_location_accessibility_/very_steep_trail"),
            text(
                "comments",
                "birding_location_accessibility_/trail_slope_comments",
            ),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.trailWidthPullouts",
        gate: None,
        fields: &[
            flag("atLeast36in", "birding_location_accessibility_/wide_trail"),
            flag("atLeast60in", "birding_location_accessibility_/extra_wide_trail"),
            flag(
                "relativelyNarrow",
                "birding_location_accessibility_/narrow_trail",
            ),
            flag("noPullouts", "birding_location_accessibility_/no_pullouts"),
            flag(
                "pulloutsEvery1000ft",
                "birding_location_accessibility_/pullouts_1_8",
            ),
            flag(
                "pulloutsLessFrequent",
                "birding_location_accessibility_/pullouts",
            ),
            text(
                "comments",
                "birding_location_accessibility_/trail_width_comments",
            ),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.otherTrailUsers",
        gate: None,
        fields: &[
            flag("cyclists", "birding_location_accessibility_/cyclists"),
            flag("mountainBikes", "birding_location_accessibility_/mountain_bikes"),
            flag("inlineSkaters", "birding_location_accessibility_/inline_skaters"),
            flag("horses", "birding_location_accessibility_/horses"),
            flag("motorVehicles", "birding_location_accessibility_/motor_vehicles"),
            text(
                "comments",
                "birding_location_accessibility_/other_trail_users_comments",
            ),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.trailUsePopularity",
        gate: None,
        fields: &[
            flag("notBusy", "birding_location_accessibility_/not_busy"),
            flag("somewhatBusy", "birding_location_accessibility_/somewhat_busy"),
            flag("veryBusy", "birding_location_accessibility_/very_busy"),
            text("comments", "birding_location_accessibility_/trail_use_comments"),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.safetyConcerns",
        gate: None,
        fields: &[
            flag(
                "wellUsedDidntFeelDeserted",
                "birding_location_accessibility_/well_used",
            ),
            flag(
                "notWellUsedFewOtherUsers",
                "birding_location_accessibility_/not_well_used",
            ),
            flag(
                "parkingWellLitAtNight",
                "birding_location_accessibility_/parking_lit",
            ),
            flag("trailWellLitAtNight", "birding_location_accessibility_/trail_lit"),
            flag(
                "noticeablePresenceOfAuthorities",
                "birding_location_accessibility_/authorities",
            ),
            flag(
                "dogsOftenOffLeash",
                "birding_location_accessibility_/dogs_off_leash",
            ),
            flag("ticksOrChiggersConcern", "birding_location_accessibility_/ticks"),
            flag("wildlifeReported", "birding_location_accessibility_/wildlife"),
            flag("usedForHunting", "birding_location_accessibility_/hunting"),
            flag(
                "bordersPrivatePropertyKeepOutSigns",
                "birding_location_accessibility_/private_property",
            ),
            flag(
                "usedAsIsolatedPartySpot",
                "birding_location_accessibility_/party_spot",
            ),
            flag(
                "evidenceOfDrugOrAlcoholUse",
                "birding_location_accessibility_/drug_alcohol",
            ),
            flag(
                "hateSymbolsPresent",
                "birding_location_accessibility_/hate_symbols",
            ),
            text("comments", "birding_location_accessibility_/safety_comments"),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.shadeCover",
        gate: None,
        fields: &[
            flag(
                "completely",
                "birding_location_accessibility_/shade_info/completely_shaded",
            ),
            flag(
                "somewhat",
                "birding_location_accessibility_/shade_info/somewhat_shaded",
            ),
            flag(
                "notAtAll",
                "birding_location_accessibility_/shade_info/not_shaded",
            ),
            flag(
                "someShadedSomeNot",
                "birding_location_accessibility_/shade_info/parts_shaded",
            ),
            text(
                "comments",
                "birding_location_accessibility_/trail_shade_comments",
            ),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.blindFacilities",
        gate: None,
        fields: &[
            flag("guideRopes", "birding_location_accessibility_/guide_ropes"),
            flag("audioRecordings", "birding_location_accessibility_/audio"),
            flag(
                "tactileComponentsOnSigns",
                "birding_location_accessibility_/tactile_signs",
            ),
            flag("brailleOnSigns", "birding_location_accessibility_/braille"),
            flag(
                "tactileMarkersOnSurface",
                "birding_location_accessibility_/tactile_markers",
            ),
            flag(
                "additionalResourcesLoan",
                "birding_location_accessibility_/additional_resources",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.maintenance",
        gate: None,
        fields: &[
            flag(
                "grassySurfacesMownFrequently",
                "birding_location_accessibility_/mown_frequently",
            ),
            flag(
                "treeBranchesClearAbove7ft",
                "birding_location_accessibility_/tree_branches",
            ),
            flag(
                "vegetationPrunedNextToTrail",
                "birding_location_accessibility_/pruned_vegetation",
            ),
            flag(
                "leavesRemovedInFallWinter",
                "birding_location_accessibility_/leaves_removed",
            ),
            flag("plowedFrequentlyInWinter", "birding_location_accessibility_/plowed"),
            flag(
                "significantSurfaceDamage",
                "birding_location_accessibility_/damage",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed.nearbyNoise",
        gate: None,
        fields: &[
            flag("nearbyTraffic", "birding_location_accessibility_/traffic"),
            flag(
                "nearAirportOrFlightPath",
                "birding_location_accessibility_/airport",
            ),
            flag("ongoingIndustrial", "birding_location_accessibility_/industrial"),
            flag(
                "intermittentConstruction",
                "birding_location_accessibility_/construction",
            ),
            flag("loudBoatsNearby", "birding_location_accessibility_/boats"),
            flag("dirtBikesNearby", "birding_location_accessibility_/dirt_bikes"),
            flag(
                "largeGroupsOftenUseLocation",
                "birding_location_accessibility_/large_groups",
            ),
            local("comments", Answer::Text),
        ],
    },
    CatalogGroup {
        path: "accessibilityDetailed",
        gate: None,
        fields: &[text("otherNotes", "birding_location_accessibility_/other_notes")],
    },
    CatalogGroup {
        path: "accessibilityCriteria",
        gate: None,
        fields: &[local("notes", Answer::Text)],
    },
    CatalogGroup {
        path: "finalThoughts",
        gate: None,
        fields: &[
            text("comments", "final_thoughts/final_comments"),
            choice("overallRating", RATINGS, Some("final_thoughts/rating")),
            flag("photoPermissions", "final_thoughts/photos_permissions"),
            text("photoAltText", "final_thoughts/alternative_text"),
        ],
    },
    CatalogGroup {
        path: "contactInformation",
        gate: None,
        fields: &[
            text("name", "contact_information_optional/name"),
            text("email", "contact_information_optional/email_address"),
            text("eventCode", "event_code"),
        ],
    },
];

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let mut schema = Schema::new();
    for group in CATALOG {
        for field in group.fields {
            schema = schema.with_field(group.field_path(field), field.answer.field_kind());
        }
    }
    schema
});

/// The schema of the Birdability checklist.
pub fn schema() -> &'static Schema {
    &SCHEMA
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use birdability_types::FieldKind;

    use super::*;

    #[test]
    fn every_path_is_unique_and_well_formed() {
        let mut seen = HashSet::new();
        for group in CATALOG {
            for field in group.fields {
                let path = group.field_path(field);
                assert!(path.is_well_formed(), "{path}");
                assert!(seen.insert(path.clone()), "duplicate field {path}");
            }
        }
        assert_eq!(seen.len(), schema().len());
    }

    #[test]
    fn gates_are_tri_state_fields_of_their_group() {
        for group in CATALOG.iter().filter(|g| g.gate.is_some()) {
            let gate = group.gate_field().expect("gate field declared in group");
            assert_eq!(gate.answer, Answer::TriState, "{}", group.path);
            assert!(gate.external.is_some(), "{}", group.path);
        }
    }

    #[test]
    fn every_external_key_is_used_once() {
        let mut seen = HashSet::new();
        for group in CATALOG {
            for key in group.fields.iter().filter_map(|f| f.external) {
                assert!(seen.insert(key), "duplicate external key {key}");
            }
        }
    }

    #[test]
    fn schema_kinds_follow_catalog() {
        let schema = schema();
        assert_eq!(
            schema.kind_of(&"accessibilityDetailed.parking.hasParking".into()),
            Some(&FieldKind::TriState)
        );
        assert_eq!(
            schema.kind_of(&"accessibilityDetailed.trailSurfaces.sand".into()),
            Some(&FieldKind::Flag)
        );
        assert_eq!(
            schema.kind_of(&paths::TRAIL_TYPE.into()),
            Some(&FieldKind::choice(TRAIL_TYPES.iter().copied()))
        );
        assert_eq!(schema.kind_of(&NAME.into()), Some(&FieldKind::Text));
    }
}
