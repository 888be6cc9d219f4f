//! Arcade Classics Anniversary Collection.
//!
//! Every game's ROM set lives in the collection executable as an LZMA
//! stream. Several titles share a stream: AJAX and Typhoon, and all the
//! Haunted Castle / Akuma-Jou Dracula variants, are cut from the same blob
//! at different offsets. The offsets below match the Steam build of
//! `AA_AC_ArcadeClassics.exe`.

use std::path::Path;

use rom_harvest_core::{Catalog, CatalogEntry, ExtractError, Note, SourceLocator, Status, SubRegion};

use crate::extract::{ExtractOptions, extract_catalog_with_progress};
use crate::progress::ExtractProgress;
use crate::provider::RawContainerProvider;
use crate::report::BatchReport;

/// Container file expected in the install folder.
pub const EXECUTABLE: &str = "AA_AC_ArcadeClassics.exe";

const NOT_EXTRACTABLE: u8 = 1;
const NOT_PRESENT: u8 = 2;

const NOT_EXTRACTABLE_NOTES: &[u8] = &[NOT_EXTRACTABLE];

const NOTES: &[Note] = &[
    Note {
        id: NOT_EXTRACTABLE,
        text: "This game is not yet extractable; it might not be implemented as a usable ROM.",
    },
    Note {
        id: NOT_PRESENT,
        text: "This variant does not appear to be present in this collection.",
    },
];

const AJAX_BLOB: SourceLocator = SourceLocator::Region {
    offset: 0x11B610,
    length: 3473920,
};

const HCASTLE_BLOB: SourceLocator = SourceLocator::Region {
    offset: 0x22E110,
    length: 3310848,
};

const AJAXJ_ROMS: &[SubRegion] = &[
    SubRegion::new("770_l01.n11", 0x000000, 0x10000),
    SubRegion::new("770_l02.n12", 0x020000, 0x10000),
    SubRegion::new("770_l05.i16", 0x030000, 0x8000),
    SubRegion::new("770_f04.g16", 0x038000, 0x10000),
    SubRegion::new("770_f03.f16", 0x048000, 0x8000),
    SubRegion::new("770c13.n22", 0x090000, 0x40000),
    SubRegion::new("770c12.k22", 0x0D0000, 0x40000),
    SubRegion::new("770c09.n4", 0x110000, 0x80000),
    SubRegion::new("770c08.k4", 0x190000, 0x80000),
    SubRegion::new("770c06.f4", 0x210000, 0x40000),
    SubRegion::new("770c07.h4", 0x250000, 0x40000),
    SubRegion::new("770c10", 0x290000, 0x40000),
    SubRegion::new("770c11", 0x2D0000, 0x80000),
    SubRegion::new("63s241.j11", 0x350000, 0x200),
];

const TYPHOON_ROMS: &[SubRegion] = &[
    SubRegion::new("770_k01.n11", 0x050000, 0x10000),
    SubRegion::new("770_k02.n12", 0x060000, 0x10000),
    SubRegion::new("770_k05.i16", 0x070000, 0x8000),
    SubRegion::new("770_f04.g16", 0x038000, 0x10000),
    SubRegion::new("770_h03.f16", 0x088000, 0x8000),
    SubRegion::new("770c13.n22", 0x090000, 0x40000),
    SubRegion::new("770c12.k22", 0x0D0000, 0x40000),
    SubRegion::new("770c09.n4", 0x110000, 0x80000),
    SubRegion::new("770c08.k4", 0x190000, 0x80000),
    SubRegion::new("770c06.f4", 0x210000, 0x40000),
    SubRegion::new("770c07.h4", 0x250000, 0x40000),
    SubRegion::new("770c10", 0x290000, 0x40000),
    SubRegion::new("770c11", 0x2D0000, 0x80000),
    SubRegion::new("63s241.j11", 0x350000, 0x200),
];

/// Build a Haunted Castle ROM set: the program ROMs differ per region,
/// graphics, sound and PROMs are shared.
macro_rules! hcastle_roms {
    ($prg:literal @ $prg_at:literal, $banked:literal @ $banked_at:literal) => {
        &[
            SubRegion::new($prg, $prg_at, 0x8000),
            SubRegion::new($banked, $banked_at, 0x20000),
            SubRegion::new("768e01.e4", 0x0A0000, 0x8000),
            SubRegion::new("768c07.e17", 0x0A8000, 0x80000),
            SubRegion::new("768c09.g21", 0x128000, 0x80000),
            SubRegion::new("768c08.g19", 0x1A8000, 0x80000),
            SubRegion::new("768c04.j5", 0x228000, 0x80000),
            SubRegion::new("768c05.j6", 0x2A8000, 0x80000),
            SubRegion::new("768c13.j21", 0x328000, 0x100),
            SubRegion::new("768c11.i4", 0x328000, 0x100),
            SubRegion::new("768c14.j22", 0x328100, 0x100),
            SubRegion::new("768c10.i3", 0x328100, 0x100),
            SubRegion::new("768b12.d20", 0x328400, 0x100),
        ]
    };
}

const HCASTLE_ROMS: &[SubRegion] = hcastle_roms!("m03.k12" @ 0x078000, "b06.k8" @ 0x080000);
const HCASTLEE_ROMS: &[SubRegion] =
    hcastle_roms!("768e03.k12" @ 0x028000, "768e06.k8" @ 0x030000);
const HCASTLEK_ROMS: &[SubRegion] =
    hcastle_roms!("768k03.k12" @ 0x050000, "768g06.k8" @ 0x058000);
const AKUMAJOUN_ROMS: &[SubRegion] =
    hcastle_roms!("768n03.k12" @ 0x000000, "768j06.k8" @ 0x008000);

/// Incomplete entry: the blob location is known, the file layout is not.
const fn partial(
    identity: &'static str,
    output_name: &'static str,
    offset: usize,
    length: usize,
) -> CatalogEntry {
    CatalogEntry {
        identity,
        output_name,
        status: Status::Partial,
        notes: NOT_EXTRACTABLE_NOTES,
        source: Some(SourceLocator::Region { offset, length }),
        sub_regions: &[],
    }
}

const fn good(
    identity: &'static str,
    output_name: &'static str,
    source: SourceLocator,
    sub_regions: &'static [SubRegion],
) -> CatalogEntry {
    CatalogEntry {
        identity,
        output_name,
        status: Status::Good,
        notes: &[],
        source: Some(source),
        sub_regions,
    }
}

const ENTRIES: &[CatalogEntry] = &[
    good("AJAX (J)", "ajaxj.zip", AJAX_BLOB, AJAXJ_ROMS),
    CatalogEntry {
        identity: "AJAX",
        output_name: "ajax.zip",
        status: Status::NoRom,
        notes: &[NOT_PRESENT],
        source: None,
        sub_regions: &[],
    },
    good("Typhoon", "typhoon.zip", AJAX_BLOB, TYPHOON_ROMS),
    good(
        "Haunted Castle (Version M)",
        "hcastle.zip",
        HCASTLE_BLOB,
        HCASTLE_ROMS,
    ),
    good(
        "Haunted Castle (Version E)",
        "hcastlee.zip",
        HCASTLE_BLOB,
        HCASTLEE_ROMS,
    ),
    good(
        "Haunted Castle (Version K)",
        "hcastlek.zip",
        HCASTLE_BLOB,
        HCASTLEK_ROMS,
    ),
    good(
        "Akuma-Jou Dracula (Version N)",
        "akumajoun.zip",
        HCASTLE_BLOB,
        AKUMAJOUN_ROMS,
    ),
    partial("Nemesis", "nemesis.zip", 0x22E110, 74752),
    partial("Salamander", "salamand.zip", 0x4165D0, 4415040),
    CatalogEntry {
        identity: "Scramble",
        output_name: "scramble.zip",
        status: Status::Unresolved,
        notes: NOT_EXTRACTABLE_NOTES,
        source: None,
        sub_regions: &[],
    },
    partial("Thunder Cross", "thunderx.zip", 0x4D13D0, 1900800),
    partial("TwinBee", "twinbee.zip", 0x2F2DE0, 541184),
    partial("Vulcan Venture", "vulcan.zip", 0x37C280, 3080192),
];

pub static CATALOG: Catalog = Catalog {
    entries: ENTRIES,
    notes: NOTES,
};

/// Extract every ROM set from an install folder into `out_dir`.
///
/// A missing executable is fatal; per-game problems end up in the report.
pub fn run(
    in_dir: &Path,
    out_dir: &Path,
    options: &ExtractOptions,
    on_progress: &mut dyn FnMut(ExtractProgress),
) -> Result<BatchReport, ExtractError> {
    let mut provider = RawContainerProvider::open(&in_dir.join(EXECUTABLE))?;
    Ok(extract_catalog_with_progress(
        CATALOG.entries,
        &mut provider,
        out_dir,
        options,
        on_progress,
    ))
}
