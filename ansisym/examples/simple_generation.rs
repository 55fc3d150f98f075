//! Simple generation example: build a two-input NAND part in code and print
//! its symbol.

use ansisym::prelude::*;

fn pin(name: &str, flags: &[PinFlag], pins: [u32; 4]) -> Tile {
    PinTile::new(name, flags.iter().copied(), [("DIP14", pins.to_vec())]).into()
}

fn main() -> Result<(), AnsisymError> {
    let attrs: AttrDict = [
        Attr::new("refdes", "U?"),
        Attr::new("device", "7400"),
        Attr::new("footprint", "DIP14"),
        Attr::new("description", "Quad 2-input NAND gate"),
    ]
    .into_iter()
    .collect();

    let gates = NormalBlock::new(
        vec![PackageBlock::new("DIP14", "7400")],
        vec![
            Band::top(GlyphicTile::new(vec![Glyph::text("&")])),
            Band::io(pin("A", &[], [1, 4, 9, 12]), Tile::Empty, pin("Y", &[PinFlag::Invert], [3, 6, 8, 11])),
            Band::io(pin("B", &[], [2, 5, 10, 13]), Tile::Empty, Tile::Empty),
            Band::bottom(),
        ],
    );
    let power = NormalBlock::new(
        vec![PackageBlock::new("DIP14", "7400-pwr")],
        vec![
            Band::top(Tile::Empty),
            Band::io(
                PinTile::new("VCC", [PinFlag::Power], [("DIP14", vec![14])]),
                Tile::Empty,
                Tile::Empty,
            ),
            Band::io(
                PinTile::new("GND", [PinFlag::Power], [("DIP14", vec![7])]),
                Tile::Empty,
                Tile::Empty,
            ),
            Band::bottom(),
        ],
    );
    let part = Part::new(attrs, vec![gates.into(), power.into()], DirectiveDict::new());

    let result = AnsisymCore::generate(&part, &GenerateOptions::default())?;
    for diagnostic in &result.diagnostics {
        eprintln!("{}", diagnostic);
    }
    if result.has_fatal() {
        eprintln!("\nGeneration failed (fatal diagnostics).");
        std::process::exit(1);
    }

    for symbol in &result.symbols {
        println!("--- {} ---", symbol.file_name());
        print!("{}", symbol);
    }
    Ok(())
}
