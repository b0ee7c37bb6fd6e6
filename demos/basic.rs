extern crate hanyu;

use hanyu::{OutputFormat, Pinyin, ToneType, VCharType};

fn main() {
    let pinyin = Pinyin::new();

    // Default format: tone numbers, `u:` spelling, lowercase.
    println!("{:?}", pinyin.to_pinyin('吕'));

    let format = OutputFormat {
        tone_type: ToneType::Mark,
        v_char_type: VCharType::UUnicode,
        ..OutputFormat::default()
    };

    for ch in ['李', '吕', '偻', 'A'] {
        match pinyin.to_pinyin_with_format(ch, &format) {
            Ok(Some(readings)) => println!("{ch}: {}", readings.join(", ")),
            Ok(None) => println!("{ch}: no pinyin known"),
            Err(e) => eprintln!("{e}"),
        }
    }
}
