use super::*;
use crate::geometry::Rect;
use crate::model::{
    Attr, Band, Block, DirectiveValue, GlyphicTile, NormalBlock, PackageBlock, PinFlag,
    PinTile, SpacerTile, Tile,
};

fn pin(name: &str, flags: &[PinFlag], pins: &[(&str, Vec<u32>)]) -> Tile {
    PinTile::new(
        name,
        flags.iter().copied(),
        pins.iter().map(|(k, v)| (k.to_string(), v.clone())),
    )
    .into()
}

fn block(packages: &[(&str, &str)], bands: Vec<Band>) -> Block {
    NormalBlock::new(
        packages
            .iter()
            .map(|(pkg, name)| PackageBlock::new(*pkg, *name))
            .collect(),
        bands,
    )
    .into()
}

fn part(blocks: Vec<Block>) -> Part {
    let attrs = [Attr::new("refdes", "U?"), Attr::new("device", "TEST")]
        .into_iter()
        .collect();
    Part::new(attrs, blocks, DirectiveDict::new())
}

fn generate(part: &Part) -> Vec<SymbolFile> {
    let mut fonts = FontCache::new();
    let mut sink = Diagnostics::new();
    SymbolEngine::run(part, &mut fonts, &mut sink).unwrap()
}

fn count(file: &SymbolFile, prefix: &str) -> usize {
    file.lines.iter().filter(|l| l.starts_with(prefix)).count()
}

fn single_pin_block() -> Block {
    block(
        &[("DIP", "single")],
        vec![
            Band::top(Tile::Empty),
            Band::io(pin("A", &[], &[("DIP", vec![1])]), Tile::Empty, Tile::Empty),
            Band::bottom(),
        ],
    )
}

#[test]
fn test_single_pin_symbol() {
    let files = generate(&part(vec![single_pin_block()]));
    assert_eq!(files.len(), 1);
    let file = &files[0];
    assert_eq!(file.file_name(), "single.sym");
    assert_eq!(file.package, "DIP");
    let expected = [
        "v 20100214 1",
        "L 300 400 600 400 3 20 1 0 -1 -1",
        "L 300 0 300 400 3 20 1 0 -1 -1",
        "L 300 0 600 0 3 20 1 0 -1 -1",
        "L 600 0 600 400 3 20 1 0 -1 -1",
        "T 600 600 5 10 0 0 0 0 1",
        "device=TEST",
        "T 450 425 5 10 1 1 0 3 1",
        "refdes=U?",
        "P 0 200 300 200 1 0 0",
        "{",
        "T 315 200 5 8 1 1 0 1 1",
        "pinlabel=A",
        "T 125 215 5 8 1 1 0 6 1",
        "pinnumber=1",
        "T 0 200 5 10 0 0 0 7 1",
        "pinseq=1",
        "T -900 215 5 10 0 0 0 7 1",
        "pintype=in",
        "}",
    ];
    assert_eq!(file.lines, expected);
}

#[test]
fn test_stages_run_in_order() {
    let p = part(vec![single_pin_block()]);
    let mut fonts = FontCache::new();
    let mut sink = Diagnostics::new();
    let mut engine = SymbolEngine::new(&p, &mut fonts);
    assert_eq!(engine.stage(), Stage::Unmeasured);

    assert!(matches!(
        engine.render(&mut sink),
        Err(EngineError::OutOfOrder {
            expected: Stage::Placed,
            found: Stage::Unmeasured,
            ..
        })
    ));
    assert!(matches!(engine.place(&mut sink), Err(EngineError::OutOfOrder { .. })));

    engine.measure().unwrap();
    assert!(engine.measure().is_err());
    engine.place(&mut sink).unwrap();
    assert_eq!(engine.stage(), Stage::Placed);
    let files = engine.render(&mut sink).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(engine.stage(), Stage::Rendered);
    assert!(engine.render(&mut sink).is_err());
    assert!(sink.is_empty());
}

#[test]
fn test_slot_attributes() {
    let b = block(
        &[("DIP14", "nand")],
        vec![
            Band::top(Tile::Empty),
            Band::io(
                pin("A", &[], &[("DIP14", vec![1, 4])]),
                Tile::Empty,
                pin("Y", &[PinFlag::Invert], &[("DIP14", vec![3, 6])]),
            ),
            Band::io(pin("B", &[], &[("DIP14", vec![2, 5])]), Tile::Empty, Tile::Empty),
            Band::bottom(),
        ],
    );
    let files = generate(&part(vec![b]));
    let lines = &files[0].lines;
    assert!(lines.contains(&"numslots=2".to_string()));
    let slotdefs: Vec<_> = lines.iter().filter(|l| l.starts_with("slotdef=")).collect();
    assert_eq!(slotdefs, ["slotdef=1:1,3,2", "slotdef=2:4,6,5"]);
    assert!(lines.contains(&"slot=1".to_string()));
    // the first slot supplies the pin numbers
    let numbers: Vec<_> = lines.iter().filter(|l| l.starts_with("pinnumber=")).collect();
    assert_eq!(numbers, ["pinnumber=1", "pinnumber=3", "pinnumber=2"]);
}

#[test]
fn test_single_slot_has_no_slot_attributes() {
    let files = generate(&part(vec![single_pin_block()]));
    assert_eq!(count(&files[0], "numslots="), 0);
    assert_eq!(count(&files[0], "slotdef="), 0);
}

#[test]
fn test_shadow_pins_skipped() {
    let b = block(
        &[("DIP", "gate"), ("SO", "gate-so")],
        vec![
            Band::top(Tile::Empty),
            Band::io(
                pin("A", &[], &[("DIP", vec![1]), ("SO", vec![2])]),
                Tile::Empty,
                pin("EN", &[], &[("DIP", vec![0]), ("SO", vec![1])]),
            ),
            Band::io(pin("B", &[], &[("DIP", vec![2]), ("SO", vec![3])]), Tile::Empty, Tile::Empty),
            Band::bottom(),
        ],
    );
    let files = generate(&part(vec![b]));
    assert_eq!(files.len(), 2);
    let dip = files.iter().find(|f| f.package == "DIP").unwrap();
    let so = files.iter().find(|f| f.package == "SO").unwrap();
    assert_eq!(dip.block, "gate");
    assert_eq!(so.block, "gate-so");
    assert_eq!(count(dip, "P "), 2);
    assert_eq!(count(so, "P "), 3);
    assert!(!dip.lines.contains(&"pinlabel=EN".to_string()));
    let seqs: Vec<_> = dip.lines.iter().filter(|l| l.starts_with("pinseq=")).collect();
    assert_eq!(seqs, ["pinseq=1", "pinseq=2"]);
    let seqs: Vec<_> = so.lines.iter().filter(|l| l.starts_with("pinseq=")).collect();
    assert_eq!(seqs, ["pinseq=1", "pinseq=2", "pinseq=3"]);
}

#[test]
fn test_neck_in_middle_outline() {
    let b = block(
        &[("DIP", "ff")],
        vec![
            Band::top(Tile::Empty),
            Band::io(pin("A", &[], &[("DIP", vec![1])]), Tile::Empty, Tile::Empty),
            Band::neck(Tile::Empty),
            Band::io(pin("B", &[], &[("DIP", vec![2])]), Tile::Empty, Tile::Empty),
            Band::bottom(),
        ],
    );
    let files = generate(&part(vec![b]));
    assert_eq!(count(&files[0], "L "), 11);
}

#[test]
fn test_neck_at_bottom_outline() {
    let b = block(
        &[("DIP", "ctl")],
        vec![
            Band::top(Tile::Empty),
            Band::io(pin("A", &[], &[("DIP", vec![1])]), Tile::Empty, Tile::Empty),
            Band::neck(Tile::Empty),
            Band::bottom(),
        ],
    );
    let p = part(vec![b]);
    let mut fonts = FontCache::new();
    let mut sink = Diagnostics::new();
    let mut engine = SymbolEngine::new(&p, &mut fonts);
    engine.measure().unwrap();
    engine.place(&mut sink).unwrap();
    let view = engine.blocks()[0].as_normal().unwrap();
    let bottom = view.bands.last().unwrap();
    assert_eq!(bottom.rect.map(|r| r.h), Some(0));
    let outline = view.outline();
    assert_eq!(outline.len(), 8);
    // indented bottom edge on the baseline
    let rect = view.rect.unwrap();
    let last = outline.last().unwrap();
    assert_eq!(last.p1.y, 0);
    assert_eq!(last.p1.x, rect.x + NECK_INDENT);
    assert_eq!(last.p2.x, rect.right() - NECK_INDENT);
}

#[test]
fn test_rendering_is_deterministic() {
    let p = part(vec![single_pin_block()]);
    assert_eq!(generate(&p), generate(&p));
}

#[test]
fn test_same_width_and_min_width() {
    let wide = block(
        &[("DIP", "wide")],
        vec![
            Band::top(Tile::Empty),
            Band::io(
                pin("VERY_LONG_PIN_NAME", &[], &[("DIP", vec![1])]),
                Tile::Empty,
                pin("ANOTHER_LONG_NAME", &[], &[("DIP", vec![2])]),
            ),
            Band::bottom(),
        ],
    );
    let narrow = block(
        &[("DIP", "narrow")],
        vec![
            Band::top(Tile::Empty),
            Band::io(pin("C", &[], &[("DIP", vec![3])]), Tile::Empty, Tile::Empty),
            Band::bottom(),
        ],
    );
    let widths = |p: &Part| -> Vec<i32> {
        let mut fonts = FontCache::new();
        let mut sink = Diagnostics::new();
        let mut engine = SymbolEngine::new(p, &mut fonts);
        engine.measure().unwrap();
        engine.place(&mut sink).unwrap();
        engine
            .blocks()
            .iter()
            .filter_map(BlockView::as_normal)
            .map(|b| b.rect.map_or(0, |r: Rect| r.w))
            .collect()
    };

    let mut p = part(vec![wide, narrow]);
    let plain = widths(&p);
    assert!(plain[0] > plain[1]);
    assert!(plain.iter().all(|w| w % 100 == 0));

    p.directives.set("samewidth", DirectiveValue::Bool(true)).unwrap();
    let same = widths(&p);
    assert_eq!(same[0], same[1]);
    assert_eq!(same[0], plain[0]);

    p.directives.set("samewidth", DirectiveValue::Bool(false)).unwrap();
    p.directives.set("minwidth", DirectiveValue::Int(5000)).unwrap();
    assert_eq!(widths(&p), [5000, 5000]);
}

#[test]
fn test_pin_decorations() {
    let b = block(
        &[("DIP", "deco")],
        vec![
            Band::top(Tile::Empty),
            Band::io(
                pin("CLK", &[PinFlag::Clock, PinFlag::Invert], &[("DIP", vec![1])]),
                Tile::Empty,
                pin("D", &[PinFlag::In], &[("DIP", vec![2])]),
            ),
            Band::io(
                pin("Q", &[PinFlag::Out], &[("DIP", vec![3])]),
                Tile::Empty,
                pin("R", &[PinFlag::Schmitt], &[("DIP", vec![4])]),
            ),
            Band::bottom(),
        ],
    );
    let files = generate(&part(vec![b]));
    // outline 4, clock 2, invert 2, in-arrow 2, out-arrow 2, schmitt 4
    assert_eq!(count(&files[0], "L "), 16);
    let types: Vec<_> = files[0].lines.iter().filter(|l| l.starts_with("pintype=")).collect();
    assert_eq!(types, ["pintype=clk", "pintype=in", "pintype=out", "pintype=out"]);
}

#[test]
fn test_bidirectional_styles() {
    let make = |style: i64| {
        let b = block(
            &[("DIP", "io")],
            vec![
                Band::top(Tile::Empty),
                Band::io(
                    pin("D0", &[PinFlag::Bidirectional], &[("DIP", vec![1])]),
                    Tile::Empty,
                    pin("D1", &[PinFlag::Bidirectional, PinFlag::Invert], &[("DIP", vec![2])]),
                ),
                Band::bottom(),
            ],
        );
        let mut p = part(vec![b]);
        p.directives.set("bidirstyle", DirectiveValue::Int(style)).unwrap();
        count(&generate(&p)[0], "L ")
    };
    // outline 4 + inverted bowtie 3, plus two arrowheads in style 1
    assert_eq!(make(0), 7);
    assert_eq!(make(1), 11);
    assert_eq!(make(5), 4);
}

#[test]
fn test_glyph_text_and_references() {
    let mut p = part(vec![]);
    p.attrs.add(Attr::new("footprint", "DIP8"));
    let mut sink = Diagnostics::new();
    let title = GlyphicTile::from_template("@footprint@", &mut p.attrs, "glyphs", &mut sink, Default::default());
    let mixed = GlyphicTile::from_template("&ge&1", &mut p.attrs, "glyphs", &mut sink, Default::default());
    assert!(sink.is_empty());
    p.blocks.push(block(
        &[("DIP", "glyphs")],
        vec![
            Band::top(title),
            Band::io(pin("A", &[], &[("DIP", vec![1])]), mixed, Tile::Empty),
            Band::bottom(),
        ],
    ));
    let files = generate(&p);
    let lines = &files[0].lines;
    // referenced attribute shows as block text, not as a hidden attribute
    assert_eq!(lines.iter().filter(|l| *l == "footprint=DIP8").count(), 1);
    let at = lines.iter().position(|l| l == "footprint=DIP8").unwrap();
    assert!(lines[at - 1].starts_with("T ") && lines[at - 1].ends_with(" 9 10 1 1 0 3 1"));
    let one = lines.iter().position(|l| l == "1").unwrap();
    assert!(lines[one - 1].ends_with(" 9 10 1 1 0 0 1"));
    // the ge graphic: three strokes at art width
    assert_eq!(count(&files[0], "L ") - 4, 3);
    assert!(files[0].lines.iter().any(|l| l.starts_with("L ") && l.contains(" 3 10 1 ")));
    assert!(p.attrs.get("footprint").unwrap().is_referenced_by("glyphs"));
}

#[test]
fn test_separators_and_spacers() {
    let b = block(
        &[("DIP", "sp")],
        vec![
            Band::top(Tile::Empty),
            Band::io(pin("A", &[], &[("DIP", vec![1])]), SpacerTile::new(200, 100), Tile::Empty),
            Band::separator(false),
            Band::separator(true),
            Band::bottom(),
        ],
    );
    let mut p = part(vec![b]);
    assert_eq!(count(&generate(&p)[0], "L "), 6);

    p.directives.set("showspacers", DirectiveValue::Bool(true)).unwrap();
    let files = generate(&p);
    assert_eq!(count(&files[0], "L "), 10);
    assert_eq!(
        files[0].lines.iter().filter(|l| l.ends_with(" 3 5 1 2 20 20")).count(),
        4
    );
}

#[test]
fn test_refdes_above_top_band() {
    let files = generate(&part(vec![single_pin_block()]));
    let at = files[0].lines.iter().position(|l| l == "refdes=U?").unwrap();
    assert_eq!(files[0].lines[at - 1], "T 450 425 5 10 1 1 0 3 1");
}

#[test]
fn test_unused_blocks_render_nothing() {
    let p = part(vec![
        single_pin_block(),
        crate::model::UnusedBlock::new("DIP", vec![2]).into(),
    ]);
    assert_eq!(generate(&p).len(), 1);
}
