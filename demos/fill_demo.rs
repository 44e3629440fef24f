use clap::Parser;
use probe_map::InsertError;
use probe_map::ProbeMap;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 16)]
    capacity: usize,

    /// Step between inserted keys; values > 1 force probe collisions.
    #[arg(short = 's', long = "key-step", default_value_t = 1)]
    key_step: u64,
}

fn main() {
    let args = Args::parse();

    if args.key_step == 0 {
        eprintln!("--key-step must be nonzero");
        std::process::exit(1);
    }

    let mut map = match ProbeMap::with_capacity(args.capacity) {
        Ok(map) => map,
        Err(err) => {
            eprintln!("cannot create map: {err}");
            std::process::exit(1);
        }
    };

    println!("Created ProbeMap with capacity {}", map.capacity());
    println!("Filling with keys stepped by {}...", args.key_step);

    let mut inserted = 0u64;
    loop {
        let key = inserted * args.key_step;
        match map.insert(key, &format!("value_{key}")) {
            Ok(()) => inserted += 1,
            Err(InsertError::Full) => break,
            Err(err) => {
                eprintln!("unexpected insert failure for key {key}: {err}");
                std::process::exit(1);
            }
        }
    }

    println!(
        "Inserted {} entries, load factor {:.2}%",
        map.len(),
        map.load_factor() * 100.0
    );

    let rejected = map.insert(u64::MAX, "overflow");
    println!("One more insert reports: {:?}", rejected.unwrap_err());

    println!("Iteration order (table-index order, not key order):");
    for (key, value) in &map {
        println!("  {key:>6} => {value}");
    }

    if let Some((first, _)) = map.first_key_value() {
        let target = map.len() / 2;
        let mut removed = 0;
        let mut cursor = first;
        while removed < target {
            let next = map.next_key_value(cursor).map(|(key, _)| key);
            map.remove(cursor);
            removed += 1;
            match next {
                Some(key) => cursor = key,
                None => break,
            }
        }
        println!(
            "Removed {removed} entries, load factor now {:.2}%",
            map.load_factor() * 100.0
        );
    }

    println!("Remaining entries: {}", map.len());
}
