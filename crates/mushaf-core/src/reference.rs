//! Fixed reference table of the 114 chapters.
//!
//! The table is the single source of truth for chapter names, origin, and
//! expected verse counts. Quran-wide totals are derived from it rather than
//! hardcoded separately.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Origin;

/// Number of chapters in the reference table.
pub const CHAPTER_COUNT: usize = 114;

/// Static metadata for one chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChapterMeta {
    pub number: u16,
    /// Transliterated name, e.g. "Al-Fatihah".
    pub name: &'static str,
    /// Name in Arabic script.
    pub original_name: &'static str,
    pub origin: Origin,
    pub verse_count: u16,
}

const fn meta(
    number: u16,
    name: &'static str,
    original_name: &'static str,
    origin: Origin,
    verse_count: u16,
) -> ChapterMeta {
    ChapterMeta {
        number,
        name,
        original_name,
        origin,
        verse_count,
    }
}

/// All chapters in canonical order.
pub const CHAPTERS: [ChapterMeta; CHAPTER_COUNT] = [
    meta(1, "Al-Fatihah", "الفاتحة", Origin::Meccan, 7),
    meta(2, "Al-Baqarah", "البقرة", Origin::Medinan, 286),
    meta(3, "Ali 'Imran", "آل عمران", Origin::Medinan, 200),
    meta(4, "An-Nisa", "النساء", Origin::Medinan, 176),
    meta(5, "Al-Ma'idah", "المائدة", Origin::Medinan, 120),
    meta(6, "Al-An'am", "الأنعام", Origin::Meccan, 165),
    meta(7, "Al-A'raf", "الأعراف", Origin::Meccan, 206),
    meta(8, "Al-Anfal", "الأنفال", Origin::Medinan, 75),
    meta(9, "At-Tawbah", "التوبة", Origin::Medinan, 129),
    meta(10, "Yunus", "يونس", Origin::Meccan, 109),
    meta(11, "Hud", "هود", Origin::Meccan, 123),
    meta(12, "Yusuf", "يوسف", Origin::Meccan, 111),
    meta(13, "Ar-Ra'd", "الرعد", Origin::Medinan, 43),
    meta(14, "Ibrahim", "إبراهيم", Origin::Meccan, 52),
    meta(15, "Al-Hijr", "الحجر", Origin::Meccan, 99),
    meta(16, "An-Nahl", "النحل", Origin::Meccan, 128),
    meta(17, "Al-Isra", "الإسراء", Origin::Meccan, 111),
    meta(18, "Al-Kahf", "الكهف", Origin::Meccan, 110),
    meta(19, "Maryam", "مريم", Origin::Meccan, 98),
    meta(20, "Taha", "طه", Origin::Meccan, 135),
    meta(21, "Al-Anbya", "الأنبياء", Origin::Meccan, 112),
    meta(22, "Al-Hajj", "الحج", Origin::Medinan, 78),
    meta(23, "Al-Mu'minun", "المؤمنون", Origin::Meccan, 118),
    meta(24, "An-Nur", "النور", Origin::Medinan, 64),
    meta(25, "Al-Furqan", "الفرقان", Origin::Meccan, 77),
    meta(26, "Ash-Shu'ara", "الشعراء", Origin::Meccan, 227),
    meta(27, "An-Naml", "النمل", Origin::Meccan, 93),
    meta(28, "Al-Qasas", "القصص", Origin::Meccan, 88),
    meta(29, "Al-'Ankabut", "العنكبوت", Origin::Meccan, 69),
    meta(30, "Ar-Rum", "الروم", Origin::Meccan, 60),
    meta(31, "Luqman", "لقمان", Origin::Meccan, 34),
    meta(32, "As-Sajdah", "السجدة", Origin::Meccan, 30),
    meta(33, "Al-Ahzab", "الأحزاب", Origin::Medinan, 73),
    meta(34, "Saba", "سبأ", Origin::Meccan, 54),
    meta(35, "Fatir", "فاطر", Origin::Meccan, 45),
    meta(36, "Ya-Sin", "يس", Origin::Meccan, 83),
    meta(37, "As-Saffat", "الصافات", Origin::Meccan, 182),
    meta(38, "Sad", "ص", Origin::Meccan, 88),
    meta(39, "Az-Zumar", "الزمر", Origin::Meccan, 75),
    meta(40, "Ghafir", "غافر", Origin::Meccan, 85),
    meta(41, "Fussilat", "فصلت", Origin::Meccan, 54),
    meta(42, "Ash-Shuraa", "الشورى", Origin::Meccan, 53),
    meta(43, "Az-Zukhruf", "الزخرف", Origin::Meccan, 89),
    meta(44, "Ad-Dukhan", "الدخان", Origin::Meccan, 59),
    meta(45, "Al-Jathiyah", "الجاثية", Origin::Meccan, 37),
    meta(46, "Al-Ahqaf", "الأحقاف", Origin::Meccan, 35),
    meta(47, "Muhammad", "محمد", Origin::Medinan, 38),
    meta(48, "Al-Fath", "الفتح", Origin::Medinan, 29),
    meta(49, "Al-Hujurat", "الحجرات", Origin::Medinan, 18),
    meta(50, "Qaf", "ق", Origin::Meccan, 45),
    meta(51, "Adh-Dhariyat", "الذاريات", Origin::Meccan, 60),
    meta(52, "At-Tur", "الطور", Origin::Meccan, 49),
    meta(53, "An-Najm", "النجم", Origin::Meccan, 62),
    meta(54, "Al-Qamar", "القمر", Origin::Meccan, 55),
    meta(55, "Ar-Rahman", "الرحمن", Origin::Medinan, 78),
    meta(56, "Al-Waqi'ah", "الواقعة", Origin::Meccan, 96),
    meta(57, "Al-Hadid", "الحديد", Origin::Medinan, 29),
    meta(58, "Al-Mujadila", "المجادلة", Origin::Medinan, 22),
    meta(59, "Al-Hashr", "الحشر", Origin::Medinan, 24),
    meta(60, "Al-Mumtahanah", "الممتحنة", Origin::Medinan, 13),
    meta(61, "As-Saf", "الصف", Origin::Medinan, 14),
    meta(62, "Al-Jumu'ah", "الجمعة", Origin::Medinan, 11),
    meta(63, "Al-Munafiqun", "المنافقون", Origin::Medinan, 11),
    meta(64, "At-Taghabun", "التغابن", Origin::Medinan, 18),
    meta(65, "At-Talaq", "الطلاق", Origin::Medinan, 12),
    meta(66, "At-Tahrim", "التحريم", Origin::Medinan, 12),
    meta(67, "Al-Mulk", "الملك", Origin::Meccan, 30),
    meta(68, "Al-Qalam", "القلم", Origin::Meccan, 52),
    meta(69, "Al-Haqqah", "الحاقة", Origin::Meccan, 52),
    meta(70, "Al-Ma'arij", "المعارج", Origin::Meccan, 44),
    meta(71, "Nuh", "نوح", Origin::Meccan, 28),
    meta(72, "Al-Jinn", "الجن", Origin::Meccan, 28),
    meta(73, "Al-Muzzammil", "المزمل", Origin::Meccan, 20),
    meta(74, "Al-Muddaththir", "المدثر", Origin::Meccan, 56),
    meta(75, "Al-Qiyamah", "القيامة", Origin::Meccan, 40),
    meta(76, "Al-Insan", "الإنسان", Origin::Medinan, 31),
    meta(77, "Al-Mursalat", "المرسلات", Origin::Meccan, 50),
    meta(78, "An-Naba", "النبأ", Origin::Meccan, 40),
    meta(79, "An-Nazi'at", "النازعات", Origin::Meccan, 46),
    meta(80, "'Abasa", "عبس", Origin::Meccan, 42),
    meta(81, "At-Takwir", "التكوير", Origin::Meccan, 29),
    meta(82, "Al-Infitar", "الانفطار", Origin::Meccan, 19),
    meta(83, "Al-Mutaffifin", "المطففين", Origin::Meccan, 36),
    meta(84, "Al-Inshiqaq", "الانشقاق", Origin::Meccan, 25),
    meta(85, "Al-Buruj", "البروج", Origin::Meccan, 22),
    meta(86, "At-Tariq", "الطارق", Origin::Meccan, 17),
    meta(87, "Al-A'la", "الأعلى", Origin::Meccan, 19),
    meta(88, "Al-Ghashiyah", "الغاشية", Origin::Meccan, 26),
    meta(89, "Al-Fajr", "الفجر", Origin::Meccan, 30),
    meta(90, "Al-Balad", "البلد", Origin::Meccan, 20),
    meta(91, "Ash-Shams", "الشمس", Origin::Meccan, 15),
    meta(92, "Al-Layl", "الليل", Origin::Meccan, 21),
    meta(93, "Ad-Duhaa", "الضحى", Origin::Meccan, 11),
    meta(94, "Ash-Sharh", "الشرح", Origin::Meccan, 8),
    meta(95, "At-Tin", "التين", Origin::Meccan, 8),
    meta(96, "Al-'Alaq", "العلق", Origin::Meccan, 19),
    meta(97, "Al-Qadr", "القدر", Origin::Meccan, 5),
    meta(98, "Al-Bayyinah", "البينة", Origin::Medinan, 8),
    meta(99, "Az-Zalzalah", "الزلزلة", Origin::Medinan, 8),
    meta(100, "Al-'Adiyat", "العاديات", Origin::Meccan, 11),
    meta(101, "Al-Qari'ah", "القارعة", Origin::Meccan, 11),
    meta(102, "At-Takathur", "التكاثر", Origin::Meccan, 8),
    meta(103, "Al-'Asr", "العصر", Origin::Meccan, 3),
    meta(104, "Al-Humazah", "الهمزة", Origin::Meccan, 9),
    meta(105, "Al-Fil", "الفيل", Origin::Meccan, 5),
    meta(106, "Quraysh", "قريش", Origin::Meccan, 4),
    meta(107, "Al-Ma'un", "الماعون", Origin::Meccan, 7),
    meta(108, "Al-Kawthar", "الكوثر", Origin::Meccan, 3),
    meta(109, "Al-Kafirun", "الكافرون", Origin::Meccan, 6),
    meta(110, "An-Nasr", "النصر", Origin::Medinan, 3),
    meta(111, "Al-Masad", "المسد", Origin::Meccan, 5),
    meta(112, "Al-Ikhlas", "الإخلاص", Origin::Meccan, 4),
    meta(113, "Al-Falaq", "الفلق", Origin::Meccan, 5),
    meta(114, "An-Nas", "الناس", Origin::Meccan, 6),
];

/// Look up a chapter by its number (1-114).
pub fn chapter_meta(number: u16) -> Result<&'static ChapterMeta> {
    number
        .checked_sub(1)
        .and_then(|idx| CHAPTERS.get(usize::from(idx)))
        .ok_or(Error::ChapterOutOfRange(number))
}

/// Total number of verses across all chapters.
pub fn total_verse_count() -> u32 {
    CHAPTERS.iter().map(|c| u32::from(c.verse_count)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_complete_and_ordered() {
        assert_eq!(CHAPTERS.len(), 114);
        for (idx, chapter) in CHAPTERS.iter().enumerate() {
            assert_eq!(usize::from(chapter.number), idx + 1);
            assert!(chapter.verse_count > 0);
        }
    }

    #[test]
    fn test_total_verse_count() {
        assert_eq!(total_verse_count(), 6236);
    }

    #[test]
    fn test_chapter_meta_lookup() {
        let fatihah = chapter_meta(1).unwrap();
        assert_eq!(fatihah.name, "Al-Fatihah");
        assert_eq!(fatihah.verse_count, 7);
        assert_eq!(fatihah.origin, Origin::Meccan);

        let baqarah = chapter_meta(2).unwrap();
        assert_eq!(baqarah.verse_count, 286);
        assert_eq!(baqarah.origin, Origin::Medinan);

        assert!(matches!(chapter_meta(0), Err(Error::ChapterOutOfRange(0))));
        assert!(matches!(chapter_meta(115), Err(Error::ChapterOutOfRange(115))));
    }

    #[test]
    fn test_origin_counts() {
        let medinan = CHAPTERS
            .iter()
            .filter(|c| c.origin == Origin::Medinan)
            .count();
        assert_eq!(medinan, 28);
    }
}
