mod capture;
mod wav;
