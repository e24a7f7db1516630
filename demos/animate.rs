use grid_astar::{AstarSearch, Grid, Role, Step};
use grid_util::point::Point;
use std::{thread, time::Duration};

// Animates a search on a 10x10 grid whose top rows look like
// S.........
// ..######..
// .......#..
// ..#....#..
// ..#....#.E
// where
// - # marks a barrier
// - S marks the start
// - E marks the end
//
// Every frame shows open cells as `o` and closed cells as `x`; the final frame marks
// the path with `*`.

fn main() {
    let mut grid = Grid::new(10).unwrap();
    grid.set_role(Point::new(0, 0), Role::Start).unwrap();
    grid.set_role(Point::new(9, 4), Role::End).unwrap();
    for x in 2..8 {
        grid.set_role(Point::new(x, 1), Role::Barrier).unwrap();
    }
    for y in 2..5 {
        grid.set_role(Point::new(7, y), Role::Barrier).unwrap();
    }
    for y in 3..5 {
        grid.set_role(Point::new(2, y), Role::Barrier).unwrap();
    }

    let mut search = AstarSearch::new(&mut grid).unwrap();
    loop {
        match search.step(&mut grid) {
            Ok(Step::Continue(point)) => {
                println!("Expanded {}:\n{}", point, grid);
                thread::sleep(Duration::from_millis(50));
            }
            Ok(Step::Done(path)) => {
                grid.mark_path(&path).unwrap();
                println!(
                    "Path of {} moves after {} expansions:\n{}",
                    path.edge_count(),
                    search.expansions(),
                    grid
                );
                break;
            }
            Err(err) => {
                println!("{}:\n{}", err, grid);
                break;
            }
        }
    }
}
