// MFont
// copyright zipxing@hotmail.com 2022～2025

/// mfont command line...
///
/// Usage:
/// mfont create font.ttf charset.txt out/font.buct out/font_{}.bfont out/font.bctex \
///     2048 2048 20= 24=filters/24.txt
/// mfont create ... --icons 24 --icon-dir icons --font 16=fonts/small.ttf
/// mfont build job.toml
/// mfont inspect out/font_24.bfont
///
/// shortcut:
/// mfont c ...
/// mfont b job.toml
/// mfont i out/font.buct
///
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mfont::config::SizeSpec;
use std::path::PathBuf;

fn global_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Log every glyph"),
    )
    .arg(
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .global(true)
            .conflicts_with("verbose")
            .action(ArgAction::SetTrue)
            .help("Only log warnings and errors"),
    )
    .arg(
        Arg::new("log_file")
            .long("log-file")
            .global(true)
            .value_parser(value_parser!(PathBuf))
            .help("Also write the log to this file"),
    )
}

fn positional(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).help(help).required(true)
}

pub fn make_command() -> Command {
    global_args(
        Command::new("mfont")
            .author("zipxing@hotmail.com")
            .about("Build MUCT/MFNT bitmap fonts and their texture atlas from a TTF")
            .subcommand_required(true)
            .arg_required_else_help(true),
    )
    .subcommand(
        Command::new("create")
            .alias("c")
            .about("Build a font from command line arguments")
            .arg(positional("ttf", "TrueType font file").value_parser(value_parser!(PathBuf)))
            .arg(
                positional("charset", "Character set file (UTF-16)")
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                positional("glyph_table", "Glyph table output (.buct)")
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(positional("font_descriptor", "Descriptor output, {} is replaced by the size"))
            .arg(
                positional("texture", "Texture output (.bctex is written as .png)")
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(positional("width", "Atlas width").value_parser(value_parser!(u32)))
            .arg(positional("height", "Atlas height").value_parser(value_parser!(u32)))
            .arg(
                Arg::new("sizes")
                    .help("SIZE=FILTER pairs, an empty FILTER renders every character")
                    .required(true)
                    .num_args(1..)
                    .value_parser(|s: &str| s.parse::<SizeSpec>().map_err(|e| e.to_string())),
            )
            .arg(
                Arg::new("font")
                    .long("font")
                    .value_name("SIZE=PATH")
                    .action(ArgAction::Append)
                    .help("Use another TTF for one size"),
            )
            .arg(
                Arg::new("icons")
                    .long("icons")
                    .value_name("SIZE")
                    .action(ArgAction::Append)
                    .value_parser(value_parser!(u32))
                    .help("Add the icon glyphs to this size"),
            )
            .arg(
                Arg::new("icon_dir")
                    .long("icon-dir")
                    .value_parser(value_parser!(PathBuf))
                    .help("Directory holding the icon PNGs"),
            )
            .arg(
                Arg::new("glyph_table_in_game")
                    .long("glyph-table-in-game")
                    .help("Glyph table path stored in the descriptors"),
            )
            .arg(
                Arg::new("texture_in_game")
                    .long("texture-in-game")
                    .help("Texture path stored in the descriptors"),
            )
            .arg(
                Arg::new("algorithm")
                    .long("algorithm")
                    .value_parser(["skyline", "max-rects", "guillotine"])
                    .default_value("skyline"),
            )
            .arg(
                Arg::new("order")
                    .long("order")
                    .value_parser(["descending-area", "insertion"])
                    .default_value("descending-area"),
            )
            .arg(
                Arg::new("icon_policy")
                    .long("icon-policy")
                    .value_parser(["referenced", "always"])
                    .default_value("referenced"),
            ),
    )
    .subcommand(
        Command::new("build")
            .alias("b")
            .about("Build a font from a TOML job file")
            .arg(positional("job", "Job file").value_parser(value_parser!(PathBuf))),
    )
    .subcommand(
        Command::new("inspect")
            .alias("i")
            .about("Print the contents of a glyph table or font descriptor")
            .arg(positional("file", "MUCT or MFNT file").value_parser(value_parser!(PathBuf))),
    )
}

pub fn make_parser() -> ArgMatches {
    make_command().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        make_command().debug_assert();
    }

    #[test]
    fn test_create_args() {
        let m = make_command()
            .try_get_matches_from([
                "mfont", "-v", "create", "a.ttf", "c.txt", "f.buct", "f_{}.bfont", "f.bctex",
                "256", "128", "16=", "24=f24.txt", "--icons", "24", "--font", "16=b.ttf",
            ])
            .unwrap();
        assert!(m.get_flag("verbose"));
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, "create");
        assert_eq!(sub.get_one::<u32>("width"), Some(&256));
        let sizes: Vec<&SizeSpec> = sub.get_many::<SizeSpec>("sizes").unwrap().collect();
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[1].filter, Some(PathBuf::from("f24.txt")));
        assert_eq!(sub.get_many::<u32>("icons").unwrap().copied().collect::<Vec<_>>(), vec![24]);
        assert_eq!(sub.get_one::<String>("algorithm").unwrap(), "skyline");
    }

    #[test]
    fn test_bad_size_rejected() {
        let res = make_command().try_get_matches_from([
            "mfont", "create", "a.ttf", "c.txt", "f.buct", "f.bfont", "f.png", "64", "64", "x=",
        ]);
        assert!(res.is_err());
    }
}
