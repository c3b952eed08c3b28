use infinite_wget::error::AppResult;

fn main() -> AppResult<()> {
    infinite_wget::run()
}
