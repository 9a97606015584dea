use nbtree::{from_reader, Endian, ReadOpts, Tag};

//
// This dumps an NBT file as an indented tree. The compression is detected
// from the file. Pass `--le` for little endian data and `--json` to print it
// as JSON instead. Set RUST_LOG=trace to see what the reader is doing.
//

fn dump(name: &str, tag: &Tag, indent: usize) {
    let label = if name.is_empty() {
        String::new()
    } else {
        format!("{:?}: ", name)
    };

    match tag {
        Tag::Compound(c) => {
            println!("{:indent$}{}Compound ({} entries)", "", label, c.len(), indent = indent);
            for (k, v) in c {
                dump(k, v, indent + 4);
            }
        }
        Tag::List(l) => {
            let element = l.element_type().map(|t| t.to_string());
            println!(
                "{:indent$}{}List of {} ({} entries)",
                "",
                label,
                element.as_deref().unwrap_or("nothing"),
                l.len(),
                indent = indent
            );
            for v in l {
                dump("", v, indent + 4);
            }
        }
        other => println!("{:indent$}{}{:?}", "", label, other, indent = indent),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<_> = std::env::args().skip(1).collect();
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .expect("usage: nbt-dump [--le] [--json] <file>");
    let endian = if args.iter().any(|a| a == "--le") {
        Endian::Little
    } else {
        Endian::Big
    };

    let mut file = std::fs::File::open(path).unwrap();
    let opts = ReadOpts::new().endian(endian).ensure_compound(false);
    let (name, root) = match from_reader(&mut file, &opts) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}: {}", path, e);
            std::process::exit(1);
        }
    };

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&root).unwrap());
    } else {
        dump(&name, &root, 0);
    }
}
