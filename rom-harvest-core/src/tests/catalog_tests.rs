use super::*;

const NOTES: &[Note] = &[Note {
    id: 1,
    text: "Not yet extractable.",
}];

const SPLIT: &[SubRegion] = &[SubRegion::new("a.bin", 0, 4), SubRegion::new("b.bin", 4, 4)];

const ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        identity: "Alpha",
        output_name: "alpha.zip",
        status: Status::Good,
        notes: &[],
        source: Some(SourceLocator::Region {
            offset: 0,
            length: 16,
        }),
        sub_regions: SPLIT,
    },
    CatalogEntry {
        identity: "Alpha (Alt)",
        output_name: "alphaa.zip",
        status: Status::NoRom,
        notes: &[],
        source: None,
        sub_regions: &[],
    },
    CatalogEntry {
        identity: "Beta",
        output_name: "beta.zip",
        status: Status::Partial,
        notes: &[1],
        source: Some(SourceLocator::Region {
            offset: 16,
            length: 16,
        }),
        sub_regions: &[],
    },
];

const VALID: Catalog = Catalog {
    entries: ENTRIES,
    notes: NOTES,
};

#[test]
fn status_incomplete() {
    assert!(!Status::Good.is_incomplete());
    assert!(!Status::NoRom.is_incomplete());
    assert!(Status::Partial.is_incomplete());
    assert!(Status::Unresolved.is_incomplete());
}

#[test]
fn status_labels() {
    assert_eq!(Status::NoRom.to_string(), "no-rom");
    assert_eq!(Status::Unresolved.label(), "unresolved");
}

#[test]
fn output_file_name_prefix() {
    assert_eq!(ENTRIES[0].output_file_name(), "alpha.zip");
    assert_eq!(ENTRIES[2].output_file_name(), "partial_beta.zip");
}

#[test]
fn note_lookup() {
    assert_eq!(VALID.note(1), Some("Not yet extractable."));
    assert_eq!(VALID.note(9), None);
}

#[test]
fn entry_lookup() {
    assert_eq!(VALID.entry("beta").map(|e| e.output_name), Some("beta.zip"));
    assert_eq!(VALID.entry("ALPHAA.ZIP").map(|e| e.identity), Some("Alpha (Alt)"));
    assert!(VALID.entry("gamma").is_none());
}

#[test]
fn valid_catalog_has_no_violations() {
    assert!(VALID.validate().is_empty());
}

#[test]
fn locator_display() {
    let region = SourceLocator::Region {
        offset: 0x11B610,
        length: 0x10,
    };
    assert_eq!(region.to_string(), "0x11b610+0x10");
    let asset = SourceLocator::Asset {
        bundle: "rom.bundle",
        path: "Assets/Roms/A.bytes",
    };
    assert_eq!(asset.to_string(), "rom.bundle:Assets/Roms/A.bytes");
}

const BAD_SPLIT: &[SubRegion] = &[
    SubRegion::new("x", 0, 1),
    SubRegion::new("x", 1, 1),
    SubRegion::new(DIAGNOSTIC_MEMBER, 0, 2),
];

const BAD_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        identity: "Dup",
        output_name: "dup.zip",
        status: Status::Good,
        notes: &[7],
        source: Some(SourceLocator::Region {
            offset: 0,
            length: 2,
        }),
        sub_regions: BAD_SPLIT,
    },
    CatalogEntry {
        identity: "Dup Again",
        output_name: "dup.zip",
        status: Status::NoRom,
        notes: &[],
        source: Some(SourceLocator::Region {
            offset: 0,
            length: 2,
        }),
        sub_regions: &[],
    },
    CatalogEntry {
        identity: "No Source",
        output_name: "nosource.zip",
        status: Status::Good,
        notes: &[],
        source: None,
        sub_regions: &[],
    },
    CatalogEntry {
        identity: "Split Asset",
        output_name: "split.gb",
        status: Status::Good,
        notes: &[],
        source: Some(SourceLocator::Asset {
            bundle: "rom.bundle",
            path: "Assets/Roms/S.bytes",
        }),
        sub_regions: SPLIT,
    },
];

#[test]
fn validate_reports_every_violation() {
    let catalog = Catalog {
        entries: BAD_ENTRIES,
        notes: NOTES,
    };
    let violations = catalog.validate();
    assert!(violations.contains(&CatalogViolation::DuplicateOutput("dup.zip".into())));
    assert!(violations.contains(&CatalogViolation::DuplicateMember {
        entry: "Dup".into(),
        member: "x".into(),
    }));
    assert!(violations.contains(&CatalogViolation::ReservedMember("Dup".into())));
    assert!(violations.contains(&CatalogViolation::UnknownNote {
        entry: "Dup".into(),
        id: 7,
    }));
    assert!(violations.contains(&CatalogViolation::NoRomWithSource("Dup Again".into())));
    assert!(violations.contains(&CatalogViolation::GoodWithoutSource("No Source".into())));
    assert!(violations.contains(&CatalogViolation::AssetWithSubRegions("Split Asset".into())));
    assert_eq!(violations.len(), 7);
}
