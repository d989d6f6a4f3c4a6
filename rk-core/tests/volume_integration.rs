//! Integration tests for adding and extracting files through an archive volume.

use rk_core::{
    add_from_path, checksum, extract_to_path, ArchiveVolume, Attributes, CodePage,
    ExtractOptions, LineEnding, RkError, Volume,
};

#[test]
fn test_add_then_extract_tape() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("work.rdz");
    let host = dir.path().join("xonix.bin");
    let program: Vec<u8> = (0..200u8).collect();
    std::fs::write(&host, &program).unwrap();

    let mut vol = ArchiveVolume::create(&image).unwrap();
    let name = add_from_path(&mut vol, &host, 0x3000, Attributes::new(true, false), false)
        .expect("Failed to add file");
    vol.save().unwrap();

    let vol = ArchiveVolume::open(&image).unwrap();
    let files = vol.list_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, name);
    assert_eq!(files[0].size, 200);
    assert!(files[0].attributes.read_only);

    let target = dir.path().join("xonix.rk");
    let opts = ExtractOptions {
        tape: true,
        ..Default::default()
    };
    extract_to_path(&vol, &name, &target, &opts).unwrap();

    let tape = std::fs::read(&target).unwrap();
    assert_eq!(tape.len(), program.len() + 9);
    assert_eq!(&tape[0..4], &[0x30, 0x00, 0x30, 0xC7]);
    assert_eq!(&tape[4..204], &program[..]);

    let cs = checksum(&program).unwrap();
    assert_eq!(&tape[204..], &[0x00, 0x00, 0xE6, (cs >> 8) as u8, cs as u8]);
}

#[test]
fn test_extract_text_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("docs.rdz");

    let mut vol = ArchiveVolume::create(&image).unwrap();
    // "МИР" CR "OK" CR
    vol.write_file(
        "NOTE.TXT",
        &[0x6D, 0x69, 0x72, 0x0D, b'O', b'K', 0x0D, 0xFF],
        0,
        Attributes::default(),
        false,
    )
    .unwrap();
    vol.save().unwrap();

    let vol = ArchiveVolume::open(&image).unwrap();
    let target = dir.path().join("note.txt");
    let opts = ExtractOptions {
        tape: false,
        code_page: Some(CodePage::Utf8),
        line_ending: LineEnding::Lf,
    };
    extract_to_path(&vol, "note.txt", &target, &opts).unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "МИР\nOK\n");
}

#[test]
fn test_failed_extract_leaves_target_alone() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("empty.rdz");
    let mut vol = ArchiveVolume::create(&image).unwrap();
    vol.write_file("ZERO", &[], 0, Attributes::default(), false)
        .unwrap();

    let target = dir.path().join("zero.rk");
    std::fs::write(&target, b"previous").unwrap();

    let opts = ExtractOptions {
        tape: true,
        ..Default::default()
    };
    let result = extract_to_path(&vol, "ZERO", &target, &opts);
    assert!(matches!(result, Err(RkError::EmptyFile(_))));
    assert_eq!(std::fs::read(&target).unwrap(), b"previous");
}

#[test]
fn test_delete_and_attributes_persist() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("disk.rdz");

    let mut vol = ArchiveVolume::create(&image).unwrap();
    vol.write_file("A.RK", &[1], 0, Attributes::default(), false)
        .unwrap();
    vol.write_file("B.RK", &[2], 0, Attributes::default(), false)
        .unwrap();
    vol.delete_file("A.RK").unwrap();
    vol.set_attributes("B.RK", Attributes::new(true, true)).unwrap();
    vol.save().unwrap();

    let vol = ArchiveVolume::open(&image).unwrap();
    assert!(!vol.exists("A.RK"));
    let files = vol.list_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].attributes.to_byte(), 0xC0);
}

#[test]
fn test_host_file_named_like_manifest_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("disk.rdz");
    let host = dir.path().join("MANIFEST.MF");
    std::fs::write(&host, b"user data").unwrap();

    let mut vol = ArchiveVolume::create(&image).unwrap();
    let result = add_from_path(&mut vol, &host, 0, Attributes::default(), false);
    assert!(matches!(result, Err(RkError::InvalidInput(_))));
    vol.save().unwrap();

    let vol = ArchiveVolume::open(&image).expect("volume must stay readable");
    assert!(vol.list_files().is_empty());
}
