//! Device codecs driven through the registry, as a device sync would use them

use songbase_common::song::NSEC_PER_SEC;
use songbase_common::{FileType, Song, SongUrl};
use songbase_devices::{DeviceCodecs, DeviceFamily, DeviceTarget, DeviceTrack};
use std::path::{Path, PathBuf};

fn library_song() -> Song {
    let mut song = Song::with_length("Hyperballad", "Björk", "Post", 321 * NSEC_PER_SEC);
    song.set_url(SongUrl::from_local_file(Path::new("/media/ipod/iPod_Control/Music/F03/HYPR.m4a")));
    song.set_basefilename("HYPR.m4a");
    song.set_albumartist("Björk");
    song.set_track(Some(4));
    song.set_disc(Some(1));
    song.set_year(Some(1995));
    song.set_genre("Electronic");
    song.set_bitrate(Some(256));
    song.set_samplerate(Some(44100));
    song.set_filesize(Some(10_300_000));
    song.set_mtime(Some(1_400_000_000));
    song.set_ctime(Some(1_300_000_000));
    song.set_filetype(FileType::Mp4);
    song.set_playcount(21);
    song.set_skipcount(1);
    song.set_lastplayed(Some(1_450_000_000));
    song
}

fn all_families() -> DeviceCodecs {
    DeviceCodecs::with_families([
        (DeviceFamily::Ipod, PathBuf::from("/usr/lib/libgpod.so.4")),
        (DeviceFamily::Mtp, PathBuf::from("/usr/lib/libmtp.so.9")),
    ])
}

#[test]
fn test_ipod_round_trip_preserves_song() {
    let codecs = all_families();
    let codec = codecs
        .codec_for(&DeviceTarget::Ipod {
            prefix: "/media/ipod".into(),
        })
        .unwrap();

    let song = library_song();
    let track = codec.encode(&song).unwrap();
    let DeviceTrack::Ipod(ipod) = &track else {
        panic!("Expected an iPod track");
    };
    assert_eq!(ipod.ipod_path, ":iPod_Control:Music:F03:HYPR.m4a");
    assert_eq!(ipod.type2, 0);

    let decoded = codec.decode(&track).unwrap();
    assert_eq!(decoded, song);
    assert!(decoded.is_metadata_equal(&song));
    assert_eq!(decoded.filetype(), FileType::Mp4);
    assert_eq!(decoded.playcount(), 21);
    assert_eq!(decoded.lastplayed(), Some(1_450_000_000));
}

#[test]
fn test_mtp_track_cannot_be_decoded_as_ipod() {
    let codecs = all_families();
    let mtp = codecs.codec_for(&DeviceTarget::Mtp { host: "usb-1".into() }).unwrap();
    let ipod = codecs
        .codec_for(&DeviceTarget::Ipod {
            prefix: "/media/ipod".into(),
        })
        .unwrap();

    let track = mtp.encode(&library_song()).unwrap();
    assert_eq!(track.family(), DeviceFamily::Mtp);
    assert!(ipod.decode(&track).is_err());

    let song = mtp.decode(&track).unwrap();
    assert_eq!(song.url().as_str(), "mtp://usb-1/0");
    assert_eq!(song.albumartist(), "");
}

#[test]
fn test_every_filetype_maps_to_a_device_code() {
    let codecs = all_families();
    let mtp = codecs.codec_for(&DeviceTarget::Mtp { host: "usb-1".into() }).unwrap();

    for filetype in FileType::ALL {
        let mut song = library_song();
        song.set_filetype(filetype);
        let decoded = mtp.decode(&mtp.encode(&song).unwrap()).unwrap();

        let expected = match filetype {
            FileType::Asf => FileType::Unknown,
            FileType::Mp4 => FileType::Mp4,
            FileType::Mpeg => FileType::Mpeg,
            FileType::Flac | FileType::OggFlac => FileType::OggFlac,
            FileType::OggSpeex | FileType::OggVorbis => FileType::OggVorbis,
            FileType::Wav => FileType::Wav,
            _ => FileType::Unknown,
        };
        assert_eq!(decoded.filetype(), expected, "{:?} through MTP", filetype);
    }
}
